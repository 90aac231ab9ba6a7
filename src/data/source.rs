//! The seam between the provider and whatever serves the rows.

use crate::data::error::DataResult;
use crate::data::transform::{RawRow, transform_rows};
use crate::types::SensorRecord;
use async_trait::async_trait;

/// A remote tabular source of sensor rows.
///
/// `fetch_rows` may fail; `transform` must not. A dashboard with no source
/// configured simply has no `RecordSource` at all.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &str;

    async fn fetch_rows(&self) -> DataResult<Vec<RawRow>>;

    fn transform(&self, rows: &[RawRow]) -> Vec<SensorRecord> {
        transform_rows(rows)
    }
}

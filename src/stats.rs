//! Aggregate counts over a record collection.

use crate::types::{SensorRecord, SensorStatus};
use serde::{Deserialize, Serialize};

/// Status tallies for the summary cards.
///
/// `total` counts every record, including ones whose status is not one of
/// the three known values, so `live + trouble + not_deployed` can be lower
/// than `total` when such records are present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStats {
    pub total: usize,
    pub live: usize,
    pub trouble: usize,
    pub not_deployed: usize,
}

impl SensorStats {
    /// Records counted in `total` but in none of the status buckets
    pub fn unclassified(&self) -> usize {
        self.total
            .saturating_sub(self.live + self.trouble + self.not_deployed)
    }
}

/// Tally records by status in a single pass.
pub fn compute_stats<'a, I>(records: I) -> SensorStats
where
    I: IntoIterator<Item = &'a SensorRecord>,
{
    records
        .into_iter()
        .fold(SensorStats::default(), |mut acc, record| {
            acc.total += 1;
            match record.status {
                SensorStatus::Live => acc.live += 1,
                SensorStatus::Trouble => acc.trouble += 1,
                SensorStatus::NotDeployed => acc.not_deployed += 1,
                SensorStatus::Other(_) => {}
            }
            acc
        })
}

//! CSV export of the current result set.
//!
//! [`csv_content`] builds the payload and is pure; [`write_csv_export`] is the
//! only function that touches the filesystem.

use crate::constants::CSV_HEADERS;
use crate::data::DataResult;
use crate::types::SensorRecord;
use chrono::{NaiveDate, Utc};
use std::borrow::Borrow;
use std::path::{Path, PathBuf};

/// Quote a field unconditionally, doubling internal quotes
fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Export columns of one record, in header order
fn export_fields(record: &SensorRecord) -> [&str; 12] {
    [
        record.customer_name.as_str(),
        record.sensor_assigned.as_str(),
        record.deployment_date.as_str(),
        record.status.label(),
        record.latest_updates.as_str(),
        record.reason_for_trouble.as_str(),
        record.resolution_status.as_str(),
        record.deployment.as_str(),
        record.unit.as_str(),
        record.application.as_str(),
        record.parameter.as_str(),
        record.measurement_range.as_str(),
    ]
}

/// Build the CSV text for `records` in their current order.
///
/// The header row is written as-is; every data field is quoted. Rows are
/// joined by `\n` with no trailing newline.
///
/// Written by hand: `csv::Writer` cannot leave the header unquoted while
/// quoting every field, nor omit the final terminator.
pub fn csv_content<R: Borrow<SensorRecord>>(records: &[R]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for record in records {
        let cells: Vec<String> = export_fields(record.borrow())
            .iter()
            .map(|value| quote_field(value))
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

/// CSV payload as UTF-8 bytes
pub fn export_csv<R: Borrow<SensorRecord>>(records: &[R]) -> Vec<u8> {
    csv_content(records).into_bytes()
}

/// `<base>-<YYYY-MM-DD>.csv`
pub fn export_filename(base: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", base, date.format("%Y-%m-%d"))
}

/// Write the export into `dir`, named after today's UTC date.
/// Returns the path written to.
pub fn write_csv_export<R: Borrow<SensorRecord>>(
    dir: &Path,
    base: &str,
    records: &[R],
) -> DataResult<PathBuf> {
    let path = dir.join(export_filename(base, Utc::now().date_naive()));
    std::fs::write(&path, export_csv(records))?;
    tracing::info!(path = %path.display(), rows = records.len(), "Exported CSV");
    Ok(path)
}

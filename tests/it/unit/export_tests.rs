//! Unit tests for CSV export.

use crate::helpers::{TestRecordBuilder, numbered_records};
use sensor_dashboard::constants::CSV_HEADERS;
use sensor_dashboard::data_table::TableState;
use sensor_dashboard::export::{csv_content, export_csv, write_csv_export};
use sensor_dashboard::types::{FilterField, SensorStatus};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_round_trip_with_awkward_update_text() {
    let updates = "Recalibrated, then drifted\n\"Needs\" a new \"electrode\"";
    let record = TestRecordBuilder::new("1")
        .customer("Acme")
        .sensor("pH, inline")
        .status(SensorStatus::Trouble)
        .updates(updates)
        .build();

    let payload = export_csv(&[&record]);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(payload.as_slice());

    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, CSV_HEADERS);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(&row[0], "Acme");
    assert_eq!(&row[1], "pH, inline");
    assert_eq!(&row[3], "Trouble");
    assert_eq!(&row[4], updates);
    assert_eq!(row.len(), 12);
}

#[test]
fn test_rows_follow_input_order() {
    let records = numbered_records(3);
    let reversed: Vec<_> = records.iter().rev().collect();
    let content = csv_content(&reversed);

    let customers: Vec<&str> = content
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(
        customers,
        vec!["\"Customer 03\"", "\"Customer 02\"", "\"Customer 01\""]
    );
    assert!(!content.ends_with('\n'));
}

#[test]
fn test_export_uses_filtered_view() {
    let records = numbered_records(12);
    let mut table = TableState::new();
    table.set_filter(FilterField::Unit, Some("Boiler".to_string()));

    let content = csv_content(&table.filtered(&records));
    assert_eq!(content.lines().count(), 1 + 6);
}

#[test]
fn test_write_csv_export() {
    let dir = tempdir().unwrap();
    let records = numbered_records(2);

    let path = write_csv_export(dir.path(), "sensor-data", &records).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("sensor-data-"));
    assert!(name.ends_with(".csv"));
    assert_eq!(name.len(), "sensor-data-YYYY-MM-DD.csv".len());

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, csv_content(&records));
}

#[test]
fn test_write_into_missing_dir_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let records = numbered_records(1);
    assert!(write_csv_export(&missing, "sensor-data", &records).is_err());
}

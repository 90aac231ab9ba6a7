//! Snapshot tests using the insta crate.
//!
//! These pin the JSON shapes the presentation layer consumes. Snapshots are
//! inline, so a change to a serialized shape shows up in the diff of this
//! file.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::TestRecordBuilder;
use sensor_dashboard::data::SheetEndpoint;
use sensor_dashboard::provider::ProviderPhase;
use sensor_dashboard::query::FilterVocabulary;
use sensor_dashboard::settings::DashboardSettings;
use sensor_dashboard::stats::SensorStats;
use sensor_dashboard::types::{FilterOptions, SensorStatus, SortConfig, SortDirection, SortKey};

// ============================================================================
// Record & Stats
// ============================================================================

#[test]
fn snapshot_sensor_record() {
    let record = TestRecordBuilder::new("S-1")
        .customer("Acme")
        .sensor("pH Analyzer")
        .deployed("28 Sep 23")
        .status(SensorStatus::Live)
        .unit("Boiler")
        .build();
    insta::assert_json_snapshot!(record, @r#"
    {
      "id": "S-1",
      "customerName": "Acme",
      "sensorAssigned": "pH Analyzer",
      "deploymentDate": "28 Sep 23",
      "status": "Live",
      "latestUpdates": "",
      "reasonForTrouble": "",
      "resolutionStatus": "",
      "deployment": "",
      "unit": "Boiler",
      "application": "",
      "parameter": "",
      "measurementRange": ""
    }
    "#);
}

#[test]
fn snapshot_sensor_stats() {
    let stats = SensorStats {
        total: 5,
        live: 2,
        trouble: 1,
        not_deployed: 1,
    };
    insta::assert_json_snapshot!(stats, @r#"
    {
      "total": 5,
      "live": 2,
      "trouble": 1,
      "notDeployed": 1
    }
    "#);
}

// ============================================================================
// Query State
// ============================================================================

#[test]
fn snapshot_sort_config() {
    let sort = SortConfig::new(SortKey::ReasonForTrouble, SortDirection::Descending);
    insta::assert_json_snapshot!(sort, @r#"
    {
      "key": "reasonForTrouble",
      "direction": "desc"
    }
    "#);
}

#[test]
fn snapshot_filter_options() {
    let filters = FilterOptions {
        status: Some("NA".to_string()),
        unit: Some("Boiler".to_string()),
        ..Default::default()
    };
    insta::assert_json_snapshot!(filters, @r#"
    {
      "status": "NA",
      "customer": null,
      "unit": "Boiler",
      "parameter": null
    }
    "#);
}

#[test]
fn snapshot_filter_vocabulary() {
    let records = vec![
        TestRecordBuilder::new("1").customer("Delta").unit("CIP Skid").build(),
        TestRecordBuilder::new("2").customer("Apex").parameter("pH").build(),
    ];
    insta::assert_json_snapshot!(FilterVocabulary::from_records(&records), @r#"
    {
      "customers": [
        "Apex",
        "Delta"
      ],
      "units": [
        "CIP Skid"
      ],
      "parameters": [
        "pH"
      ]
    }
    "#);
}

// ============================================================================
// Provider & Settings
// ============================================================================

#[test]
fn snapshot_provider_phase() {
    let phase = ProviderPhase::Ready {
        connected: false,
        using_fallback: true,
    };
    insta::assert_json_snapshot!(phase, @r#"
    {
      "phase": "ready",
      "connected": false,
      "usingFallback": true
    }
    "#);
}

#[test]
fn snapshot_settings_with_sheet() {
    let settings = DashboardSettings {
        source: Some(SheetEndpoint::values_api("abc123", "secret")),
        ..Default::default()
    };
    insta::assert_json_snapshot!(settings, {
        ".source.api_key" => "[api_key]",
    }, @r#"
    {
      "refresh_interval_ms": 300000,
      "fetch_timeout_secs": 30,
      "export_basename": "sensor-data",
      "source": {
        "kind": "values_api",
        "spreadsheet_id": "abc123",
        "range": "Sheet1",
        "api_key": "[api_key]",
        "base_url": "https://sheets.googleapis.com/v4/spreadsheets"
      }
    }
    "#);
}

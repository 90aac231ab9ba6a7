//! Bundled sample data set.
//!
//! Shown before the first load and whenever the sheet is unreachable or not
//! configured. Callers pass it to the provider explicitly.

use crate::types::{SensorRecord, SensorStatus};
use once_cell::sync::Lazy;
use std::sync::Arc;

static SAMPLE: Lazy<Arc<Vec<SensorRecord>>> = Lazy::new(|| Arc::new(build_sample()));

/// Shared handle to the bundled sample records
pub fn sample_records() -> Arc<Vec<SensorRecord>> {
    Arc::clone(&SAMPLE)
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    customer_name: &str,
    sensor_assigned: &str,
    deployment_date: &str,
    status: SensorStatus,
    unit: &str,
    application: &str,
    parameter: &str,
    measurement_range: &str,
) -> SensorRecord {
    SensorRecord {
        id: id.to_string(),
        customer_name: customer_name.to_string(),
        sensor_assigned: sensor_assigned.to_string(),
        deployment_date: deployment_date.to_string(),
        status,
        unit: unit.to_string(),
        application: application.to_string(),
        parameter: parameter.to_string(),
        measurement_range: measurement_range.to_string(),
        ..Default::default()
    }
}

fn build_sample() -> Vec<SensorRecord> {
    let mut records = vec![
        entry(
            "1",
            "Apex Chemicals",
            "pH Analyzer PH-200",
            "28 Sep 23",
            SensorStatus::Live,
            "Effluent Treatment",
            "Wastewater monitoring",
            "pH",
            "0-14 pH",
        ),
        entry(
            "2",
            "Apex Chemicals",
            "Conductivity Probe EC-40",
            "02 Oct 23",
            SensorStatus::Trouble,
            "Cooling Tower",
            "Blowdown control",
            "Conductivity",
            "0-20 mS/cm",
        ),
        entry(
            "3",
            "Bluewater Utilities",
            "DO Sensor OX-9",
            "15 Nov 23",
            SensorStatus::Live,
            "Aeration Basin",
            "Aeration control",
            "Dissolved Oxygen",
            "0-20 mg/L",
        ),
        entry(
            "4",
            "Bluewater Utilities",
            "Turbidity Meter TB-3",
            "",
            SensorStatus::NotDeployed,
            "Clarifier",
            "Filtration",
            "Turbidity",
            "0-1000 NTU",
        ),
        entry(
            "5",
            "Crestline Paper",
            "ORP Sensor RX-12",
            "09 Jan 24",
            SensorStatus::Live,
            "Bleach Plant",
            "Chlorine dioxide dosing",
            "ORP",
            "-1500-1500 mV",
        ),
        entry(
            "6",
            "Crestline Paper",
            "pH Analyzer PH-200",
            "21 Feb 24",
            SensorStatus::Trouble,
            "Effluent Treatment",
            "Final discharge",
            "pH",
            "0-14 pH",
        ),
        entry(
            "7",
            "Delta Foods",
            "Temperature Probe TP-1",
            "04 Mar 24",
            SensorStatus::Live,
            "Pasteurizer",
            "Process heating",
            "Temperature",
            "0-150 °C",
        ),
        entry(
            "8",
            "Delta Foods",
            "Conductivity Probe EC-40",
            "",
            SensorStatus::NotDeployed,
            "CIP Skid",
            "Clean-in-place",
            "Conductivity",
            "0-200 mS/cm",
        ),
    ];

    records[0].latest_updates = "Calibrated on site; readings stable.".to_string();
    records[0].deployment = "Permanent".to_string();
    records[1].latest_updates = "Drift observed after cleaning cycle.".to_string();
    records[1].reason_for_trouble = "Electrode fouling".to_string();
    records[1].resolution_status = "Replacement electrode shipped".to_string();
    records[1].deployment = "Permanent".to_string();
    records[2].latest_updates = "Data logging to SCADA verified.".to_string();
    records[2].deployment = "Trial".to_string();
    records[4].latest_updates = "Readings within expected range.".to_string();
    records[4].deployment = "Trial".to_string();
    records[5].latest_updates = "Intermittent signal loss.".to_string();
    records[5].reason_for_trouble = "Damaged cable gland".to_string();
    records[5].resolution_status = "Site visit scheduled".to_string();
    records[5].deployment = "Permanent".to_string();
    records[6].latest_updates = "Installed, awaiting operator sign-off.".to_string();
    records[6].deployment = "Permanent".to_string();
    records
}

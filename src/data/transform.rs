//! Raw sheet rows and their mapping into sensor records.
//!
//! The mapping is total: unknown headers are ignored, missing cells become
//! empty strings and blank rows are dropped. Nothing here returns an error.

use crate::types::{SensorRecord, SensorStatus, SortKey};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One sheet row keyed by header text.
///
/// Rows shorter than the header row simply lack the trailing keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(header, value);
        self
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is whitespace
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }

    /// Zip a header row with a value row. Extra values past the last header
    /// are dropped.
    pub fn from_cells(headers: &[String], values: &[String]) -> Self {
        let cells = headers
            .iter()
            .zip(values)
            .filter(|(header, _)| !header.trim().is_empty())
            .map(|(header, value)| (header.trim().to_string(), value.clone()))
            .collect();
        Self { cells }
    }
}

/// Split a grid (first row = headers) into keyed rows.
pub fn rows_from_grid(grid: &[Vec<String>]) -> Vec<RawRow> {
    let Some((headers, body)) = grid.split_first() else {
        return Vec::new();
    };
    body.iter()
        .map(|values| RawRow::from_cells(headers, values))
        .collect()
}

/// Lowercase and strip everything but letters and digits
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Record field a sheet header maps to, if any
pub fn field_for_header(header: &str) -> Option<SortKey> {
    let key = match normalize_header(header).as_str() {
        "id" | "sensorid" | "recordid" => SortKey::Id,
        "customername" | "customer" | "client" => SortKey::CustomerName,
        "sensorassigned" | "sensor" => SortKey::SensorAssigned,
        "deploymentdate" | "dateofdeployment" | "date" => SortKey::DeploymentDate,
        "status" | "sensorstatus" => SortKey::Status,
        "latestupdates" | "latestupdate" | "updates" => SortKey::LatestUpdates,
        "reasonfortrouble" | "troublereason" => SortKey::ReasonForTrouble,
        "resolutionstatus" | "resolution" => SortKey::ResolutionStatus,
        "deployment" => SortKey::Deployment,
        "unit" | "plant" => SortKey::Unit,
        "application" => SortKey::Application,
        "parameter" => SortKey::Parameter,
        "measurementrange" | "range" => SortKey::MeasurementRange,
        _ => return None,
    };
    Some(key)
}

fn assign(record: &mut SensorRecord, key: SortKey, value: &str) {
    let value = value.trim();
    let slot = match key {
        SortKey::Status => {
            record.status = SensorStatus::parse(value);
            return;
        }
        SortKey::Id => &mut record.id,
        SortKey::CustomerName => &mut record.customer_name,
        SortKey::SensorAssigned => &mut record.sensor_assigned,
        SortKey::DeploymentDate => &mut record.deployment_date,
        SortKey::LatestUpdates => &mut record.latest_updates,
        SortKey::ReasonForTrouble => &mut record.reason_for_trouble,
        SortKey::ResolutionStatus => &mut record.resolution_status,
        SortKey::Deployment => &mut record.deployment,
        SortKey::Unit => &mut record.unit,
        SortKey::Application => &mut record.application,
        SortKey::Parameter => &mut record.parameter,
        SortKey::MeasurementRange => &mut record.measurement_range,
    };
    *slot = value.to_string();
}

/// Map one raw row. `position` is the row's 0-based index in the sheet body
/// and seeds the fallback id.
pub fn record_from_row(position: usize, row: &RawRow) -> SensorRecord {
    let mut record = SensorRecord::default();
    for (header, value) in row.iter() {
        if let Some(key) = field_for_header(header) {
            assign(&mut record, key, value);
        }
    }
    if record.id.is_empty() {
        record.id = format!("row-{}", position + 1);
    }
    record
}

/// Suffix repeated ids with `#2`, `#3`, ... in row order so every id is
/// unique. The first occurrence keeps its id.
fn dedupe_ids(records: &mut [SensorRecord]) {
    let mut used: HashSet<String> = HashSet::with_capacity(records.len());
    for record in records.iter_mut() {
        if used.insert(record.id.clone()) {
            continue;
        }
        let original = std::mem::take(&mut record.id);
        let unique = (2..)
            .map(|n| format!("{original}#{n}"))
            .find(|candidate| !used.contains(candidate))
            .unwrap_or_default();
        tracing::debug!(id = %original, renamed = %unique, "Duplicate record id");
        used.insert(unique.clone());
        record.id = unique;
    }
}

/// Map raw rows to records, skipping blank rows. Ids are unique across the
/// result.
pub fn transform_rows(rows: &[RawRow]) -> Vec<SensorRecord> {
    let unmapped: BTreeSet<&str> = rows
        .iter()
        .flat_map(RawRow::iter)
        .map(|(header, _)| header)
        .filter(|header| field_for_header(header).is_none())
        .collect();
    if !unmapped.is_empty() {
        tracing::debug!(headers = ?unmapped, "Ignoring unrecognized sheet columns");
    }

    let mut records: Vec<SensorRecord> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.is_blank())
        .map(|(position, row)| record_from_row(position, row))
        .collect();
    dedupe_ids(&mut records);

    tracing::debug!(
        rows = rows.len(),
        records = records.len(),
        "Transformed sheet rows"
    );
    records
}

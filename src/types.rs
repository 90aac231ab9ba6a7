//! Core types for the sensor dashboard.
//!
//! This module defines the record shape shared by every pipeline stage, plus
//! the query-state types (filters and sort configuration) the presentation
//! layer hands back to the query engine.

use crate::format::parse_deployment_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ============================================================================
// Sensor Record
// ============================================================================

/// One deployment-status entry for a physical sensor.
///
/// Every field except `status` is free text taken verbatim from the sheet;
/// missing cells are empty strings, never absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorRecord {
    /// Stable row key across refreshes
    pub id: String,
    pub customer_name: String,
    pub sensor_assigned: String,
    /// Display string as entered in the sheet (e.g. "28 Sep 23")
    pub deployment_date: String,
    pub status: SensorStatus,
    pub latest_updates: String,
    pub reason_for_trouble: String,
    pub resolution_status: String,
    pub deployment: String,
    pub unit: String,
    pub application: String,
    pub parameter: String,
    pub measurement_range: String,
}

impl SensorRecord {
    /// Create a record with the given id and status, all text fields empty
    pub fn new(id: impl Into<String>, status: SensorStatus) -> Self {
        Self {
            id: id.into(),
            status,
            ..Default::default()
        }
    }

    /// Text value of a field, as compared by the sort
    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Id => &self.id,
            SortKey::CustomerName => &self.customer_name,
            SortKey::SensorAssigned => &self.sensor_assigned,
            SortKey::DeploymentDate => &self.deployment_date,
            SortKey::Status => self.status.label(),
            SortKey::LatestUpdates => &self.latest_updates,
            SortKey::ReasonForTrouble => &self.reason_for_trouble,
            SortKey::ResolutionStatus => &self.resolution_status,
            SortKey::Deployment => &self.deployment,
            SortKey::Unit => &self.unit,
            SortKey::Application => &self.application,
            SortKey::Parameter => &self.parameter,
            SortKey::MeasurementRange => &self.measurement_range,
        }
    }

    /// All fields in text form, the haystack for free-text search
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        SortKey::ALL.iter().map(move |key| self.field(*key))
    }

    /// Deployment date parsed into a calendar date, when recognizable
    pub fn deployed_on(&self) -> Option<NaiveDate> {
        parse_deployment_date(&self.deployment_date)
    }
}

// ============================================================================
// Status
// ============================================================================

/// Deployment status of a sensor.
///
/// Unrecognized sheet values are kept in `Other` so search and filtering see
/// the raw text; they render like `NotDeployed`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorStatus {
    Live,
    Trouble,
    /// Shown as "NA"
    #[default]
    NotDeployed,
    Other(String),
}

impl SensorStatus {
    /// Map raw sheet text to a status. Total: blank text is `NotDeployed`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "na" | "n/a" | "not deployed" => SensorStatus::NotDeployed,
            "live" => SensorStatus::Live,
            "trouble" => SensorStatus::Trouble,
            _ => SensorStatus::Other(trimmed.to_string()),
        }
    }

    /// Canonical label, also the value filters match against
    pub fn label(&self) -> &str {
        match self {
            SensorStatus::Live => "Live",
            SensorStatus::Trouble => "Trouble",
            SensorStatus::NotDeployed => "NA",
            SensorStatus::Other(raw) => raw,
        }
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            SensorStatus::Live => StatusTone::Positive,
            SensorStatus::Trouble => StatusTone::Critical,
            SensorStatus::NotDeployed | SensorStatus::Other(_) => StatusTone::Neutral,
        }
    }

    /// Whether this is one of the three known statuses
    pub fn is_known(&self) -> bool {
        !matches!(self, SensorStatus::Other(_))
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for SensorStatus {
    fn from(raw: String) -> Self {
        SensorStatus::parse(&raw)
    }
}

impl From<&str> for SensorStatus {
    fn from(raw: &str) -> Self {
        SensorStatus::parse(raw)
    }
}

impl From<SensorStatus> for String {
    fn from(status: SensorStatus) -> Self {
        status.label().to_string()
    }
}

/// Colour family a renderer should use for a status badge or row highlight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// Green
    Positive,
    /// Red
    Critical,
    /// Grey
    Neutral,
}

// ============================================================================
// Filters
// ============================================================================

/// Columns that accept an exact-match filter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Status,
    Customer,
    Unit,
    Parameter,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Status,
        FilterField::Customer,
        FilterField::Unit,
        FilterField::Parameter,
    ];

    /// The record value this filter compares against
    pub fn record_value(self, record: &SensorRecord) -> &str {
        match self {
            FilterField::Status => record.status.label(),
            FilterField::Customer => &record.customer_name,
            FilterField::Unit => &record.unit,
            FilterField::Parameter => &record.parameter,
        }
    }
}

/// Current filter selection. `None` (or an empty string) means no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub status: Option<String>,
    pub customer: Option<String>,
    pub unit: Option<String>,
    pub parameter: Option<String>,
}

impl FilterOptions {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::Status => &self.status,
            FilterField::Customer => &self.customer,
            FilterField::Unit => &self.unit,
            FilterField::Parameter => &self.parameter,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Set or clear one filter. Empty strings clear it.
    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match field {
            FilterField::Status => self.status = value,
            FilterField::Customer => self.customer = value,
            FilterField::Unit => self.unit = value,
            FilterField::Parameter => self.parameter = value,
        }
    }

    /// Filters with a non-empty constraint
    pub fn active(&self) -> impl Iterator<Item = (FilterField, &str)> {
        FilterField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// A sortable record field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    #[default]
    CustomerName,
    SensorAssigned,
    DeploymentDate,
    Status,
    LatestUpdates,
    ReasonForTrouble,
    ResolutionStatus,
    Deployment,
    Unit,
    Application,
    Parameter,
    MeasurementRange,
}

impl SortKey {
    pub const ALL: [SortKey; 13] = [
        SortKey::Id,
        SortKey::CustomerName,
        SortKey::SensorAssigned,
        SortKey::DeploymentDate,
        SortKey::Status,
        SortKey::LatestUpdates,
        SortKey::ReasonForTrouble,
        SortKey::ResolutionStatus,
        SortKey::Deployment,
        SortKey::Unit,
        SortKey::Application,
        SortKey::Parameter,
        SortKey::MeasurementRange,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Orient an ascending comparison. `Equal` stays `Equal`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active sort column and direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Sort config after the user clicks `key`'s header: the current column
    /// flips direction, any other column starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }
}

//! Application-wide constants.
//!
//! Centralizes magic numbers and fixed formats so the pipeline stages agree
//! on them.

use std::time::Duration;

// ============================================================================
// Query & Pagination
// ============================================================================

/// Rows shown per table page
pub const PAGE_SIZE: usize = 10;

/// Characters of `latest_updates` shown in the table before truncation
pub const UPDATE_PREVIEW_CHARS: usize = 100;

/// Placeholder shown when a record has no update text
pub const NO_UPDATES_TEXT: &str = "No updates available";

// ============================================================================
// Refresh & Fetch
// ============================================================================

/// Default auto-refresh interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 300_000;

/// Upper bound on a single remote fetch
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Refresh durations above this are logged as slow
pub const SLOW_REFRESH: Duration = Duration::from_secs(5);

/// Default Google Sheets v4 API root
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Range requested when none is configured
pub const DEFAULT_SHEET_RANGE: &str = "Sheet1";

// ============================================================================
// Dates
// ============================================================================

/// Two-digit years whose text compares greater than this are 19xx, the rest 20xx.
/// Compared as strings, so "50" itself maps to 2050.
pub const TWO_DIGIT_YEAR_PIVOT: &str = "50";

// ============================================================================
// Export
// ============================================================================

/// Default base name for exported files
pub const DEFAULT_EXPORT_BASENAME: &str = "sensor-data";

/// Header row of the CSV export, in column order
pub const CSV_HEADERS: [&str; 12] = [
    "Customer Name",
    "Sensor Assigned",
    "Deployment Date",
    "Status",
    "Latest Updates",
    "Reason for Trouble",
    "Resolution Status",
    "Deployment",
    "Unit",
    "Application",
    "Parameter",
    "Measurement Range",
];

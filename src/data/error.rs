//! Error types for data operations
//!
//! Provides unified error handling for fetching, parsing and exporting
//! sensor data.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during data operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Transport-level failure from reqwest (DNS, TLS, connection reset...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sheet endpoint answered with a non-success status
    #[error("Sheet request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The fetch did not complete in time
    #[error("Sheet request timed out after {0:?}")]
    Timeout(Duration),

    /// The body was not the sheet data we asked for
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

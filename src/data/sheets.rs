//! Spreadsheet-backed record source.
//!
//! Two endpoint kinds are supported:
//! - the Google Sheets v4 `values` API, which returns a JSON grid
//! - a sheet published to the web as CSV
//!
//! In both cases the first row holds the headers.

use crate::constants::{DEFAULT_SHEET_RANGE, SHEETS_API_BASE};
use crate::data::error::{DataError, DataResult};
use crate::data::source::RecordSource;
use crate::data::transform::{RawRow, rows_from_grid};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Longest error body echoed back in a status error
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Where the sheet lives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetEndpoint {
    ValuesApi {
        spreadsheet_id: String,
        #[serde(default = "default_range")]
        range: String,
        api_key: String,
        #[serde(default = "default_api_base")]
        base_url: String,
    },
    PublishedCsv {
        url: String,
    },
}

fn default_range() -> String {
    DEFAULT_SHEET_RANGE.to_string()
}

fn default_api_base() -> String {
    SHEETS_API_BASE.to_string()
}

impl SheetEndpoint {
    /// Values API endpoint on the public Google host
    pub fn values_api(spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        SheetEndpoint::ValuesApi {
            spreadsheet_id: spreadsheet_id.into(),
            range: default_range(),
            api_key: api_key.into(),
            base_url: default_api_base(),
        }
    }

    pub fn request_url(&self) -> String {
        match self {
            SheetEndpoint::ValuesApi {
                spreadsheet_id,
                range,
                api_key,
                base_url,
            } => format!(
                "{}/{}/values/{}?key={}",
                base_url.trim_end_matches('/'),
                urlencoding::encode(spreadsheet_id),
                urlencoding::encode(range),
                urlencoding::encode(api_key),
            ),
            SheetEndpoint::PublishedCsv { url } => url.clone(),
        }
    }

    /// Log label that never includes credentials
    pub fn label(&self) -> String {
        match self {
            SheetEndpoint::ValuesApi { spreadsheet_id, .. } => {
                format!("sheets-api:{spreadsheet_id}")
            }
            SheetEndpoint::PublishedCsv { .. } => "published-csv".to_string(),
        }
    }
}

/// Body of a `spreadsheets.values.get` response. An empty sheet omits `values`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a values API response body into raw rows
pub fn parse_values_payload(body: &str) -> DataResult<Vec<RawRow>> {
    let range: ValueRange = serde_json::from_str(body)?;
    let grid: Vec<Vec<String>> = range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect();
    Ok(rows_from_grid(&grid))
}

/// Parse a published CSV body into raw rows. Quoted fields may span lines.
pub fn parse_csv_payload(body: &str) -> DataResult<Vec<RawRow>> {
    // Unpublished sheets answer 200 with a sign-in page
    if body.trim_start().starts_with('<') {
        return Err(DataError::InvalidData(
            "expected CSV but got an HTML page; is the sheet published to the web?".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let grid = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    Ok(rows_from_grid(&grid))
}

/// HTTP client for one configured sheet
pub struct SheetsSource {
    endpoint: SheetEndpoint,
    label: String,
    client: reqwest::Client,
}

impl SheetsSource {
    pub fn new(endpoint: SheetEndpoint, timeout: Duration) -> DataResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            label: endpoint.label(),
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &SheetEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSource for SheetsSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_rows(&self) -> DataResult<Vec<RawRow>> {
        let response = self.client.get(self.endpoint.request_url()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(DataError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let rows = match self.endpoint {
            SheetEndpoint::ValuesApi { .. } => parse_values_payload(&body)?,
            SheetEndpoint::PublishedCsv { .. } => parse_csv_payload(&body)?,
        };
        tracing::info!(source = %self.label, rows = rows.len(), "Fetched sheet rows");
        Ok(rows)
    }
}

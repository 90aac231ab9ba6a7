//! Sensor deployment dashboard data pipeline.
//!
//! Loads sensor rows from a spreadsheet (or bundled sample data), keeps them
//! fresh on a timer, and answers the table view's search, filter, sort,
//! pagination, statistics and CSV export queries.

pub mod constants;
pub mod data;
pub mod data_table;
pub mod export;
pub mod format;
pub mod logging;
pub mod perf;
pub mod provider;
pub mod query;
pub mod settings;
pub mod stats;
pub mod types;

pub use data::{DataError, DataResult, RecordSource, SheetEndpoint, SheetsSource, sample_records};
pub use data_table::TableState;
pub use provider::{DataProvider, ProviderConfig, ProviderSnapshot, RefreshOutcome};
pub use settings::DashboardSettings;
pub use types::{
    FilterField, FilterOptions, SensorRecord, SensorStatus, SortConfig, SortDirection, SortKey,
};

//! Data loading module
//!
//! This module fetches sensor rows from a spreadsheet and maps them into
//! [`SensorRecord`](crate::types::SensorRecord)s.
//!
//! ## Error Handling
//!
//! Fetching returns `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `Http`/`Timeout`: the sheet could not be reached
//! - `Status`: the sheet answered with an error page
//! - `Json`/`Csv`: the body could not be parsed
//!
//! Mapping rows into records never fails; see [`transform_rows`].

mod error;
mod sample;
mod sheets;
mod source;
mod transform;

pub use error::*;
pub use sample::*;
pub use sheets::*;
pub use source::*;
pub use transform::*;

//! Exports OpenStreetMap wheelchair accessibility data through the Overpass API.
//!
//! The crate builds the Overpass QL query, resolves the search area with
//! Nominatim, submits the query and checks the CSV that comes back. Filtering,
//! spatial lookup and CSV serialisation all happen on the Overpass server.

pub mod apis;
pub mod cli;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod overpass;
pub mod settings;
pub mod types;

pub use error::{FailureKind, QueryError, Result};
pub use export::{CsvExport, ExportSummary};
pub use fetch::{Exporter, QuerySource};
pub use overpass::OverpassClient;
pub use types::{AreaRef, Column, ElementKind, QueryParams, TagFilter};

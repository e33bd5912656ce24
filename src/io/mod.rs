//! Input helpers.
//!
//! - CSV retrieval from a URL or a local path (`loader`)
//! - CSV text -> headers + raw rows (`ingest`)

pub mod ingest;
pub mod loader;

pub use ingest::parse_csv;
pub use loader::{CsvLoader, DataSource};

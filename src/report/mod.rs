//! Reporting utilities: status lines and table previews.
//!
//! Formatting lives here so output changes stay localized and the data code
//! stays free of presentation concerns.

pub mod status;
pub mod table;

pub use status::StatusBoard;
pub use table::{escape_html, format_table, html_table};

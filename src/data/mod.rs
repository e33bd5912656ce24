//! Row normalization: column resolution, numeric coercion, and filtering,
//! plus date helpers for numeric time axes.

pub mod coerce;
pub mod columns;
pub mod dates;
pub mod normalize;

pub use coerce::to_number;
pub use columns::{pick_column, resolve_columns};
pub use normalize::{NormalizeStats, normalize_rows, to_table};

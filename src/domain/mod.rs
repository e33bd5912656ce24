//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and normalized rows (`RawRow`, `NormalizedRow`)
//! - the tracked indicators (`Metric`) and their source columns (`ColumnMap`)
//! - run configuration (`DashboardConfig`, `ChartLayout`, `MissingPolicy`)

pub mod types;

pub use types::*;

//! `econ-dash` library crate.
//!
//! The binary (`econdash`) is a thin wrapper around this library so that:
//!
//! - the load/normalize/chart pipeline is testable without spawning processes
//! - chart specs can be produced by other tools (notebooks, static site builds)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod render;
pub mod report;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;

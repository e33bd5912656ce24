//! Vega-Lite chart specs for the dashboard.
//!
//! - `spec`: typed subset of the grammar, serialized with serde
//! - `crosshair`: hover selection plus rule/marker layers
//! - `builder`: the concrete dashboard charts
//! - `hover`: the same crosshair behavior as a state machine, for the terminal UI

pub mod builder;
pub mod crosshair;
pub mod hover;
pub mod spec;

pub use builder::{Dashboard, NamedChart, build_dashboard};
pub use crosshair::{Crosshair, ParamNamer, ensure_unique_params};
pub use hover::{HoverState, Overlay, PointerEvent, Viewport, nearest_point};
pub use spec::ChartSpec;

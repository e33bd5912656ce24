//! Terminal plots.

pub mod ascii;
pub mod series;

pub use ascii::render_metric_plot;
pub use series::MetricSeries;

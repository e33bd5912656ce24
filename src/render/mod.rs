//! Chart renderers: the boundary where specs leave the process.
//!
//! Renderers are driven sequentially. One chart failing is logged and recorded
//! on the status board; the remaining charts still render.

use std::path::PathBuf;

use serde::Serialize;

use crate::chart::{ChartSpec, Dashboard};
use crate::error::AppError;
use crate::report::StatusBoard;

pub mod html;
pub mod json;

pub use html::HtmlRenderer;
pub use json::JsonDirRenderer;

/// Vega-Embed renderer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedBackend {
    #[default]
    Svg,
    Canvas,
}

/// Options passed along with every embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmbedOptions {
    /// Show the export/source action menu.
    pub actions: bool,
    pub renderer: EmbedBackend,
}

/// Static page content that is not a chart.
#[derive(Debug, Clone, Default)]
pub struct PageParts {
    pub title: String,
    pub status: StatusBoard,
    /// Pre-rendered, already escaped HTML table.
    pub table_html: String,
}

pub trait ChartRenderer {
    /// Check the chart library up front, before anything is embedded.
    fn ensure_available(&self) -> Result<(), AppError>;

    fn embed(&mut self, target: &str, spec: &ChartSpec, options: &EmbedOptions) -> Result<(), AppError>;

    /// Flush output; returns the written page or directory.
    fn finish(&mut self, page: &PageParts) -> Result<PathBuf, AppError>;
}

/// Outcome of embedding every chart of a dashboard.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    pub embedded: Vec<String>,
    pub failed: Vec<(String, AppError)>,
}

impl RenderReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// Collapse into one error naming every failed target.
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.is_ok() {
            return Ok(self);
        }
        let targets: Vec<&str> = self.failed.iter().map(|(t, _)| t.as_str()).collect();
        Err(AppError::render(format!(
            "{} of {} charts failed to render: {}",
            self.failed.len(),
            self.failed.len() + self.embedded.len(),
            targets.join(", ")
        )))
    }
}

/// Embed every chart in order, isolating failures per chart.
pub fn render_charts(
    renderer: &mut dyn ChartRenderer,
    dashboard: &Dashboard,
    options: &EmbedOptions,
    status: &mut StatusBoard,
) -> RenderReport {
    let mut report = RenderReport::default();
    for chart in dashboard.all() {
        match renderer.embed(&chart.target, &chart.spec, options) {
            Ok(()) => {
                tracing::debug!(target_id = %chart.target, "embedded chart");
                report.embedded.push(chart.target.clone());
            }
            Err(e) => {
                tracing::warn!(target_id = %chart.target, error = %e, "chart failed to render");
                let err = AppError::new(e.kind(), format!("{}: {}", chart.target, e.message()));
                status.error(&err);
                report.failed.push((chart.target.clone(), err));
            }
        }
    }
    report
}

/// Targets become file names and element ids: ASCII letters, digits, `-`, `_`.
pub fn check_target(target: &str) -> Result<(), AppError> {
    let valid = !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::render(format!("Invalid chart target `{target}`.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_dashboard;
    use crate::domain::{ChartLayout, ColumnMap, Metric, NormalizedRow};
    use crate::error::ErrorKind;

    struct FailOn {
        target: &'static str,
        seen: Vec<String>,
    }

    impl ChartRenderer for FailOn {
        fn ensure_available(&self) -> Result<(), AppError> {
            Ok(())
        }

        fn embed(&mut self, target: &str, _: &ChartSpec, _: &EmbedOptions) -> Result<(), AppError> {
            self.seen.push(target.to_string());
            if target == self.target {
                Err(AppError::render("boom"))
            } else {
                Ok(())
            }
        }

        fn finish(&mut self, _: &PageParts) -> Result<PathBuf, AppError> {
            Ok(PathBuf::new())
        }
    }

    fn dashboard() -> Dashboard {
        let rows = vec![
            NormalizedRow::new("2020-01-01")
                .with_value(Metric::GdpBillions, 21000.0)
                .with_value(Metric::GdpGrowthYoy, 0.6)
                .with_value(Metric::UnemploymentRate, 3.8)
                .with_value(Metric::InflationYoy, 2.1),
            NormalizedRow::new("2020-04-01")
                .with_value(Metric::GdpBillions, 19500.0)
                .with_value(Metric::GdpGrowthYoy, -7.5)
                .with_value(Metric::UnemploymentRate, 13.0)
                .with_value(Metric::InflationYoy, 0.4),
        ];
        build_dashboard(&rows, &ColumnMap::canonical(), &ChartLayout::default()).unwrap()
    }

    #[test]
    fn default_options_hide_actions_and_use_svg() {
        let v = serde_json::to_value(EmbedOptions::default()).unwrap();
        assert_eq!(v, serde_json::json!({"actions": false, "renderer": "svg"}));
    }

    #[test]
    fn one_failure_does_not_stop_the_rest() {
        let dash = dashboard();
        let mut renderer = FailOn {
            target: "growth",
            seen: Vec::new(),
        };
        let mut status = StatusBoard::new();
        let report = render_charts(&mut renderer, &dash, &EmbedOptions::default(), &mut status);

        assert_eq!(renderer.seen.len(), dash.len());
        assert_eq!(report.embedded.len(), dash.len() - 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(status.error_line(), "Error: growth: boom");

        let err = report.into_result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(err.message().contains("1 of 7"));
        assert!(err.message().contains("growth"));
    }

    #[test]
    fn target_names_are_restricted() {
        assert!(check_target("labor-prices").is_ok());
        assert!(check_target("hover_2").is_ok());
        assert!(check_target("").is_err());
        assert!(check_target("../etc").is_err());
        assert!(check_target("a b").is_err());
    }
}

//! One metric as `(fractional year, value)` points for terminal plots.

use crate::chart::hover::{HoverState, Overlay, Viewport};
use crate::data::dates::date_to_x;
use crate::domain::{Metric, NormalizedRow};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    /// Source date string for each point.
    pub dates: Vec<String>,
    pub points: Vec<(f64, f64)>,
}

impl MetricSeries {
    /// Rows without a value for `metric` or with an unparseable date are skipped.
    pub fn from_rows(rows: &[NormalizedRow], metric: Metric) -> Self {
        let mut dates = Vec::new();
        let mut points = Vec::new();
        for row in rows {
            let (Some(x), Some(y)) = (date_to_x(&row.date), row.value(metric)) else {
                continue;
            };
            dates.push(row.date.clone());
            points.push((x, y));
        }
        Self { metric, dates, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        Viewport::around(&self.points)
    }

    /// Index of the point with this exact date string.
    pub fn position_of(&self, date: &str) -> Option<usize> {
        self.dates.iter().position(|d| d == date)
    }

    pub fn overlay(&self, hover: HoverState) -> Overlay {
        hover.overlay(&self.points)
    }

    /// Tooltip text for the hovered point: date, metric title, value.
    pub fn readout(&self, hover: HoverState) -> Option<String> {
        let i = hover.index()?;
        let (_, y) = self.points.get(i)?;
        let date = self.dates.get(i)?;
        Some(format!("{date} | {}: {y:.2}", self.metric.title()))
    }
}

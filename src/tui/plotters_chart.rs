//! Plotters-powered indicator chart widget for Ratatui.
//!
//! Plotters handles the coordinate mapping and line rasterization; the output
//! goes into the Ratatui buffer through `plotters-ratatui-backend`. Tick labels
//! are drawn by the caller so the plot area matches the widget rect exactly,
//! which keeps mouse-to-data mapping a plain linear transform.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::Overlay;

/// A render-only chart description. Series and bounds are computed by the caller.
pub struct IndicatorChart<'a> {
    /// `(fractional year, value)` points in time order.
    pub series: &'a [(f64, f64)],
    /// Crosshair elements to draw over the series.
    pub overlay: Overlay,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for IndicatorChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(0)
                .axis_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let rule_color = RGBColor(128, 128, 128);
            let marker_color = RGBColor(255, 255, 0); // yellow

            // Rules first so the series draws on top of them.
            if let Some(x) = self.overlay.vertical_rule {
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &rule_color))?;
            }
            if let Some(y) = self.overlay.horizontal_rule {
                chart.draw_series(LineSeries::new([(x0, y), (x1, y)], &rule_color))?;
            }

            chart.draw_series(LineSeries::new(self.series.iter().copied(), &line_color))?;
            chart.draw_series(self.series.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            // `Circle` radii are mapped incorrectly by the backend (pixel radius
            // -> normalized canvas units); a colored pixel stays a clean dot.
            if let Some((x, y)) = self.overlay.marker {
                chart.draw_series(std::iter::once(Pixel::new((x, y), marker_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

//! ASCII plotting for terminal output.
//!
//! Fixed-size grid, deterministic output (golden tests compare it verbatim).
//!
//! Plot elements:
//! - data points: `o`, joined by `.`
//! - crosshair while hovering: `|` vertical rule, `-` horizontal rule, `@` marker
//! - a `>` readout line under the grid while hovering

use crate::chart::hover::HoverState;
use crate::plot::series::MetricSeries;

/// Render one metric over time, with the crosshair for `hover`.
pub fn render_metric_plot(series: &MetricSeries, hover: HoverState, width: usize, height: usize) -> String {
    let title = series.metric.title();
    let Some(viewport) = series.viewport() else {
        return format!("Plot: {title} | no data\n");
    };

    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = pad_range(viewport.x[0], viewport.x[1], 0.0);
    let (y_min, y_max) = pad_range(viewport.y[0], viewport.y[1], 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let cell = |(x, y): (f64, f64)| {
        (
            map_x(x, x_min, x_max, width),
            map_y(y, y_min, y_max, height),
        )
    };

    // Joins first so points overlay them.
    let mut prev = None;
    for &p in &series.points {
        let (cx, cy) = cell(p);
        if let Some((px, py)) = prev {
            draw_line(&mut grid, px, py, cx, cy, '.');
        }
        prev = Some((cx, cy));
    }
    for &p in &series.points {
        let (cx, cy) = cell(p);
        grid[cy][cx] = 'o';
    }

    let overlay = series.overlay(hover);
    if let Some(x) = overlay.vertical_rule {
        let cx = map_x(x, x_min, x_max, width);
        for row in grid.iter_mut() {
            if row[cx] == ' ' {
                row[cx] = '|';
            }
        }
    }
    if let Some(y) = overlay.horizontal_rule {
        let cy = map_y(y, y_min, y_max, height);
        for c in grid[cy].iter_mut() {
            if *c == ' ' {
                *c = '-';
            }
        }
    }
    if let Some(p) = overlay.marker {
        let (cx, cy) = cell(p);
        grid[cy][cx] = '@';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {title} | x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if let Some(readout) = series.readout(hover) {
        out.push_str(&format!("> {readout}\n"));
    }

    out
}

/// Widen `[min, max]` by `frac` of its span; a degenerate range gets one unit each side.
fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < 1e-12 {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

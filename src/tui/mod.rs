//! Ratatui-based terminal dashboard.
//!
//! Shows the status lines, a line chart of the selected indicator with a
//! mouse-driven crosshair, and a preview of the raw table.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{DashboardRun, run_dashboard};
use crate::chart::{HoverState, PointerEvent, Viewport};
use crate::domain::{DashboardConfig, Metric};
use crate::error::AppError;
use crate::io::CsvLoader;
use crate::plot::MetricSeries;
use crate::report::{StatusBoard, format_table};

mod debounce;
mod plotters_chart;

use debounce::Debouncer;
use plotters_chart::IndicatorChart;

const TICK: Duration = Duration::from_millis(100);
const RESIZE_DELAY: Duration = Duration::from_millis(150);
const PREVIEW_ROWS: usize = 8;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let loader = CsvLoader::new()?;
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, loader);
    app.reload();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen, mouse) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

/// Where the last frame put the plot, for mapping mouse cells back to data.
#[derive(Debug, Clone, Copy)]
struct PlotGeometry {
    rect: Rect,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

struct App {
    config: DashboardConfig,
    loader: CsvLoader,
    status: StatusBoard,
    run: Option<DashboardRun>,
    metric: Metric,
    series: MetricSeries,
    hover: HoverState,
    plot: Option<PlotGeometry>,
    resize: Debouncer,
}

impl App {
    fn new(config: DashboardConfig, loader: CsvLoader) -> Self {
        Self {
            config,
            loader,
            status: StatusBoard::new(),
            run: None,
            metric: Metric::UnemploymentRate,
            series: MetricSeries::from_rows(&[], Metric::UnemploymentRate),
            hover: HoverState::Idle,
            plot: None,
            resize: Debouncer::new(RESIZE_DELAY),
        }
    }

    /// Re-fetch and rebuild everything; the previous load is discarded first.
    fn reload(&mut self) {
        self.run = None;
        self.hover = HoverState::Idle;
        self.run = run_dashboard(&self.config, &self.loader, &mut self.status).ok();

        if let Some(run) = &self.run {
            let tracked = run.columns.tracked();
            if !tracked.contains(&self.metric) {
                self.metric = tracked.first().copied().unwrap_or(self.metric);
            }
        }
        self.refresh_series();
    }

    fn refresh_series(&mut self) {
        let rows = self.run.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[]);
        self.series = MetricSeries::from_rows(rows, self.metric);
        self.hover = HoverState::Idle;
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.resize.fire(Instant::now()) {
                terminal
                    .clear()
                    .map_err(|e| AppError::io(format!("Terminal clear error: {e}")))?;
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let timeout = self
                .resize
                .time_left(Instant::now())
                .map_or(TICK, |left| left.min(TICK));
            if !event::poll(timeout).map_err(|e| AppError::io(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    needs_redraw |= self.handle_mouse(mouse);
                }
                Event::Resize(_, _) => {
                    self.resize.schedule(Instant::now());
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Down => self.cycle_metric(true),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up => self.cycle_metric(false),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn cycle_metric(&mut self, forward: bool) {
        let tracked = self.run.as_ref().map(|r| r.columns.tracked()).unwrap_or_default();
        if let Some(next) = cycle_tracked(self.metric, &tracked, forward) {
            self.metric = next;
            self.refresh_series();
        }
    }

    /// Returns `true` when the crosshair changed.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return false;
        }
        let Some(geom) = self.plot else {
            return false;
        };

        let event = match cell_to_data(geom.rect, mouse.column, mouse.row, geom.x_bounds, geom.y_bounds) {
            Some((x, y)) => PointerEvent::Move { x, y },
            None => PointerEvent::Out,
        };
        let viewport = Viewport {
            x: geom.x_bounds,
            y: geom.y_bounds,
        };
        let next = self.hover.apply(event, &self.series.points, &viewport);
        let changed = next != self.hover;
        self.hover = next;
        changed
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(vec![
            Span::styled("econdash", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" - {}", self.config.source)),
        ])];
        lines.push(Line::from(Span::styled(
            format!("{}   {}", self.status.load_line(), self.status.rows_line()),
            Style::default().fg(Color::Gray),
        )));
        if self.status.has_error() {
            lines.push(Line::from(Span::styled(
                self.status.error_line().to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let preview_height = self
            .run
            .as_ref()
            .map(|r| r.table.rows.len().min(PREVIEW_ROWS) as u16 + 5)
            .unwrap_or(3);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(preview_height)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_preview(frame, chunks[1]);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.metric.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(viewport) = self.series.viewport() else {
            self.plot = None;
            let msg = if self.run.is_some() {
                "No data for this indicator."
            } else {
                "Waiting for data..."
            };
            frame.render_widget(Paragraph::new(msg).style(Style::default().fg(Color::Yellow)), inner);
            return;
        };

        let (x_bounds, y_bounds) = padded_bounds(&viewport);
        let (chart_rect, insets) = chart_layout(inner);
        self.plot = Some(PlotGeometry {
            rect: chart_rect,
            x_bounds,
            y_bounds,
        });

        let widget = IndicatorChart {
            series: &self.series.points,
            overlay: self.series.overlay(self.hover),
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds, self.metric);
        }
    }

    fn draw_preview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = self
            .run
            .as_ref()
            .map(|r| format_table(&r.table, PREVIEW_ROWS.min(self.config.preview_limit), 18))
            .unwrap_or_default();
        let p = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("Data").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/arrows metric  r reload  q quit";
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
        if let Some(readout) = self.series.readout(self.hover) {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(readout, Style::default().fg(Color::Yellow)));
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Next (or previous) tracked metric after `current`, wrapping around.
fn cycle_tracked(current: Metric, tracked: &[Metric], forward: bool) -> Option<Metric> {
    let mut m = current;
    for _ in 0..Metric::ALL.len() {
        m = if forward { m.next() } else { m.prev() };
        if tracked.contains(&m) {
            return Some(m);
        }
    }
    None
}

/// Series bounds with 5% headroom on y; a flat range gets one unit each side.
fn padded_bounds(viewport: &Viewport) -> ([f64; 2], [f64; 2]) {
    let pad = |[lo, hi]: [f64; 2], frac: f64| {
        let span = hi - lo;
        if span.abs() < 1e-12 {
            [lo - 1.0, hi + 1.0]
        } else {
            [lo - span * frac, hi + span * frac]
        }
    };
    (pad(viewport.x, 0.0), pad(viewport.y, 0.05))
}

/// Map a terminal cell inside `rect` to data coordinates; `None` outside.
fn cell_to_data(rect: Rect, col: u16, row: u16, x_bounds: [f64; 2], y_bounds: [f64; 2]) -> Option<(f64, f64)> {
    let inside = col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height);
    if !inside {
        return None;
    }
    let u = f64::from(col - rect.x) / f64::from(rect.width.saturating_sub(1).max(1));
    let v = f64::from(row - rect.y) / f64::from(rect.height.saturating_sub(1).max(1));
    let x = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
    let y = y_bounds[1] - v * (y_bounds[1] - y_bounds[0]);
    Some((x, y))
}

fn fmt_axis_y(metric: Metric, v: f64) -> String {
    match metric {
        Metric::GdpBillions => format!("{v:.0}"),
        _ => format!("{v:.1}"),
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    metric: Metric,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.1}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_y(metric, y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("year")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_skips_untracked_metrics() {
        let tracked = [Metric::GdpBillions, Metric::InflationYoy];
        assert_eq!(
            cycle_tracked(Metric::GdpBillions, &tracked, true),
            Some(Metric::InflationYoy)
        );
        assert_eq!(
            cycle_tracked(Metric::InflationYoy, &tracked, true),
            Some(Metric::GdpBillions)
        );
        assert_eq!(
            cycle_tracked(Metric::GdpBillions, &tracked, false),
            Some(Metric::InflationYoy)
        );
        assert_eq!(cycle_tracked(Metric::GdpBillions, &[], true), None);
        assert_eq!(
            cycle_tracked(Metric::GdpBillions, &[Metric::GdpBillions], true),
            Some(Metric::GdpBillions)
        );
    }

    #[test]
    fn cells_map_linearly_onto_bounds() {
        let rect = Rect {
            x: 10,
            y: 5,
            width: 11,
            height: 6,
        };
        let xb = [2020.0, 2021.0];
        let yb = [0.0, 10.0];

        assert_eq!(cell_to_data(rect, 10, 5, xb, yb), Some((2020.0, 10.0)));
        assert_eq!(cell_to_data(rect, 20, 10, xb, yb), Some((2021.0, 0.0)));
        let (x, y) = cell_to_data(rect, 15, 7, xb, yb).unwrap();
        assert!((x - 2020.5).abs() < 1e-9);
        assert!((y - 6.0).abs() < 1e-9);

        assert_eq!(cell_to_data(rect, 9, 7, xb, yb), None);
        assert_eq!(cell_to_data(rect, 21, 7, xb, yb), None);
        assert_eq!(cell_to_data(rect, 15, 11, xb, yb), None);
    }

    #[test]
    fn pointer_near_a_point_then_off_the_plot() {
        let rect = Rect {
            x: 0,
            y: 0,
            width: 41,
            height: 11,
        };
        let points = vec![(2020.0, 3.8), (2020.25, 13.0), (2020.5, 8.8), (2020.75, 6.8)];
        let viewport = Viewport::around(&points).unwrap();
        let (xb, yb) = padded_bounds(&viewport);
        let vp = Viewport { x: xb, y: yb };

        // Column 13 is a third of the way across: closest to 2020.25.
        let (x, y) = cell_to_data(rect, 13, 1, xb, yb).unwrap();
        let state = HoverState::Idle.apply(PointerEvent::Move { x, y }, &points, &vp);
        assert_eq!(state, HoverState::Hover { index: 1 });
        assert_eq!(state.overlay(&points).visible_count(), 3);

        let out = match cell_to_data(rect, 50, 1, xb, yb) {
            Some((x, y)) => PointerEvent::Move { x, y },
            None => PointerEvent::Out,
        };
        let state = state.apply(out, &points, &vp);
        assert_eq!(state, HoverState::Idle);
        assert_eq!(state.overlay(&points).visible_count(), 0);
    }

    #[test]
    fn flat_series_still_has_a_range() {
        let vp = Viewport {
            x: [2020.0, 2020.0],
            y: [5.0, 5.0],
        };
        let (xb, yb) = padded_bounds(&vp);
        assert_eq!(xb, [2019.0, 2021.0]);
        assert_eq!(yb, [4.0, 6.0]);
    }
}

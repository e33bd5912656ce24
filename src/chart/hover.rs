//! Engine-independent model of the crosshair interaction.
//!
//! The interaction is a two-state machine:
//!
//! ```text
//! Idle --pointer move--> Hover(i) --pointer move--> Hover(j)
//!   ^                        |
//!   +------pointer out-------+
//! ```
//!
//! `i` is the datum nearest to the pointer. Distances are measured in the
//! normalized viewport (each axis scaled to `[0, 1]`), so a chart with years on
//! x and billions on y still picks the visually closest point.

/// A pointer event over one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer at data coordinates `(x, y)`.
    Move { x: f64, y: f64 },
    /// Pointer left the chart.
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hover {
        index: usize,
    },
}

/// Data-space bounds of the plotted area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Viewport {
    /// Tight bounds around `points`; `None` for an empty or non-finite set.
    pub fn around(points: &[(f64, f64)]) -> Option<Self> {
        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];
        for &(px, py) in points {
            x = [x[0].min(px), x[1].max(px)];
            y = [y[0].min(py), y[1].max(py)];
        }
        if x.iter().chain(y.iter()).all(|v| v.is_finite()) {
            Some(Self { x, y })
        } else {
            None
        }
    }

    fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (unit(x, self.x), unit(y, self.y))
    }
}

fn unit(v: f64, bounds: [f64; 2]) -> f64 {
    let span = bounds[1] - bounds[0];
    if span.abs() < 1e-12 { 0.0 } else { (v - bounds[0]) / span }
}

/// Index of the point nearest to `(x, y)` in normalized viewport space.
///
/// Ties resolve to the earliest point.
pub fn nearest_point(points: &[(f64, f64)], viewport: &Viewport, x: f64, y: f64) -> Option<usize> {
    let (tx, ty) = viewport.normalize(x, y);
    let mut best: Option<(usize, f64)> = None;
    for (i, &(px, py)) in points.iter().enumerate() {
        let (nx, ny) = viewport.normalize(px, py);
        let d = (nx - tx).powi(2) + (ny - ty).powi(2);
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

impl HoverState {
    /// Apply one pointer event.
    pub fn apply(self, event: PointerEvent, points: &[(f64, f64)], viewport: &Viewport) -> Self {
        match event {
            PointerEvent::Out => HoverState::Idle,
            PointerEvent::Move { x, y } => match nearest_point(points, viewport, x, y) {
                Some(index) => HoverState::Hover { index },
                None => HoverState::Idle,
            },
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            HoverState::Idle => None,
            HoverState::Hover { index } => Some(index),
        }
    }

    /// Visible crosshair elements for this state.
    pub fn overlay(self, points: &[(f64, f64)]) -> Overlay {
        match self.index().and_then(|i| points.get(i).copied()) {
            Some((x, y)) => Overlay {
                marker: Some((x, y)),
                vertical_rule: Some(x),
                horizontal_rule: Some(y),
            },
            None => Overlay::default(),
        }
    }
}

/// Crosshair elements currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overlay {
    pub marker: Option<(f64, f64)>,
    pub vertical_rule: Option<f64>,
    pub horizontal_rule: Option<f64>,
}

impl Overlay {
    /// Number of visible elements (0 while idle, 3 while hovering).
    pub fn visible_count(&self) -> usize {
        usize::from(self.marker.is_some())
            + usize::from(self.vertical_rule.is_some())
            + usize::from(self.horizontal_rule.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<(f64, f64)> {
        vec![(2020.0, 3.8), (2020.25, 13.0), (2020.5, 8.8), (2020.75, 6.8)]
    }

    #[test]
    fn nearest_uses_normalized_distance() {
        let pts = vec![(0.0, 0.0), (10.0, 1000.0)];
        let vp = Viewport::around(&pts).unwrap();
        // Raw distance favors the second point; normalized favors the first.
        assert_eq!(nearest_point(&pts, &vp, 1.0, 550.0), Some(0));
        assert_eq!(nearest_point(&pts, &vp, 6.0, 900.0), Some(1));
    }

    #[test]
    fn nearest_of_empty_is_none() {
        let vp = Viewport { x: [0.0, 1.0], y: [0.0, 1.0] };
        assert_eq!(nearest_point(&[], &vp, 0.5, 0.5), None);
    }

    #[test]
    fn ties_pick_the_first_point() {
        let pts = vec![(0.0, 0.0), (2.0, 0.0)];
        let vp = Viewport { x: [0.0, 2.0], y: [-1.0, 1.0] };
        assert_eq!(nearest_point(&pts, &vp, 1.0, 0.0), Some(0));
    }

    #[test]
    fn move_then_out_toggles_all_three_elements() {
        let pts = series();
        let vp = Viewport::around(&pts).unwrap();

        let idle = HoverState::default();
        assert_eq!(idle.overlay(&pts).visible_count(), 0);

        let hover = idle.apply(PointerEvent::Move { x: 2020.27, y: 12.0 }, &pts, &vp);
        assert_eq!(hover, HoverState::Hover { index: 1 });
        let overlay = hover.overlay(&pts);
        assert_eq!(overlay.visible_count(), 3);
        assert_eq!(overlay.marker, Some((2020.25, 13.0)));
        assert_eq!(overlay.vertical_rule, Some(2020.25));
        assert_eq!(overlay.horizontal_rule, Some(13.0));

        let out = hover.apply(PointerEvent::Out, &pts, &vp);
        assert_eq!(out, HoverState::Idle);
        assert_eq!(out.overlay(&pts), Overlay::default());
    }

    #[test]
    fn moving_follows_the_nearest_point() {
        let pts = series();
        let vp = Viewport::around(&pts).unwrap();
        let s = HoverState::Idle
            .apply(PointerEvent::Move { x: 2020.0, y: 4.0 }, &pts, &vp)
            .apply(PointerEvent::Move { x: 2020.74, y: 7.0 }, &pts, &vp);
        assert_eq!(s.index(), Some(3));
    }

    #[test]
    fn move_over_empty_chart_stays_idle() {
        let vp = Viewport { x: [0.0, 1.0], y: [0.0, 1.0] };
        let s = HoverState::Idle.apply(PointerEvent::Move { x: 0.5, y: 0.5 }, &[], &vp);
        assert_eq!(s, HoverState::Idle);
    }
}

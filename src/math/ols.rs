//! Least squares solver.
//!
//! Used for the linear GDP trend overlay:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 x_i))^2
//! ```
//!
//! We solve via SVD so a tall design matrix (many quarters, two columns) is
//! handled directly. (Nalgebra's `QR::solve` is intended for square systems.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fitted straight line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a line through `points`.
///
/// `x` is centered before solving; calendar years around 2000 would otherwise
/// make the intercept column nearly collinear with `x`.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len();
    let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n as f64;

    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut y = DVector::<f64>::zeros(n);
    for (i, &(px, py)) in points.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = px - x_mean;
        y[i] = py;
    }

    // A single distinct x leaves the slope undetermined.
    if design.column(1).iter().all(|v| v.abs() < 1e-12) {
        return None;
    }

    let beta = solve_least_squares(&design, &y)?;
    let slope = beta[1];
    Some(LinearFit {
        intercept: beta[0] - slope * x_mean,
        slope,
    })
}

// ============================================================================
// POLYNOMIAL FITTING (Least Squares)
// ============================================================================

use serde::Serialize;
use tracing::debug;

use crate::error::{LanesplitError, Result};

/// Least-squares polynomial `y = c0 + c1·x + ... + cd·x^d`.
#[derive(Clone, Debug, Serialize)]
pub struct Polynomial {
    /// Ascending powers.
    pub coeffs: Vec<f64>,
    pub rmse: f64,
    pub num_points: usize,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn eval(&self, x: f64) -> f64 {
        eval_poly(&self.coeffs, x)
    }

    /// Per-coefficient `fitted - reference`, padded with zeros on either side.
    pub fn coeff_deltas(&self, reference: &[f64]) -> Vec<f64> {
        let n = self.coeffs.len().max(reference.len());
        (0..n)
            .map(|i| {
                let a = self.coeffs.get(i).copied().unwrap_or(0.0);
                let b = reference.get(i).copied().unwrap_or(0.0);
                a - b
            })
            .collect()
    }
}

/// Horner evaluation, ascending coefficients.
#[inline]
pub fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Fit a degree-`degree` polynomial to `(x, y)` points.
///
/// The x values are mapped to [0, 1] internally for numerical stability;
/// the returned coefficients are in original x units. Builds the normal
/// equations `(VᵀV) c = Vᵀy` from power sums and solves them by Gaussian
/// elimination. Meant for low degrees, not a general-purpose fitter.
pub fn fit_polynomial(points: &[(f64, f64)], degree: usize) -> Result<Polynomial> {
    let m = degree + 1;
    if points.len() < m {
        return Err(LanesplitError::TooFewPoints {
            degree,
            needed: m,
            got: points.len(),
        });
    }

    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    if !(x_min.is_finite() && x_max.is_finite()) {
        return Err(LanesplitError::SingularFit(degree));
    }
    let x_range = if x_max > x_min { x_max - x_min } else { 1.0 };

    // s[k] = Σ u^k for k in 0..=2d, t[k] = Σ y·u^k for k in 0..=d, u = (x - x_min) / x_range
    let mut s = vec![0.0f64; 2 * degree + 1];
    let mut t = vec![0.0f64; m];
    for &(x, y) in points {
        let u = (x - x_min) / x_range;
        let mut xk = 1.0;
        for k in 0..s.len() {
            s[k] += xk;
            if k < m {
                t[k] += y * xk;
            }
            xk *= u;
        }
    }

    let mut mat = vec![0.0f64; m * m];
    for r in 0..m {
        for c in 0..m {
            mat[r * m + c] = s[r + c];
        }
    }
    let normalized = solve_linear(mat, t, m).ok_or(LanesplitError::SingularFit(degree))?;
    let coeffs = denormalize(&normalized, x_min, x_range);

    let sse: f64 = points
        .iter()
        .map(|&(x, y)| {
            let r = y - eval_poly(&coeffs, x);
            r * r
        })
        .sum();
    let rmse = (sse / points.len() as f64).sqrt();
    debug!(degree, rmse, points = points.len(), "polynomial fit");

    Ok(Polynomial {
        coeffs,
        rmse,
        num_points: points.len(),
    })
}

/// Rewrite `q((x - x0) / scale)` as ascending powers of `x`.
fn denormalize(q: &[f64], x0: f64, scale: f64) -> Vec<f64> {
    let mut out = vec![0.0f64; q.len()];
    for (k, &qk) in q.iter().enumerate() {
        let lead = qk / scale.powi(k as i32);
        // (x - x0)^k = Σ_j C(k, j) x^j (-x0)^(k-j)
        let mut binom = 1.0f64;
        for j in 0..=k {
            out[j] += lead * binom * (-x0).powi((k - j) as i32);
            binom = binom * (k - j) as f64 / (j + 1) as f64;
        }
    }
    out
}

/// Solve an `n×n` system (row-major) by Gaussian elimination with partial
/// pivoting. Returns `None` if the system is singular.
fn solve_linear(mut mat: Vec<f64>, mut rhs: Vec<f64>, n: usize) -> Option<Vec<f64>> {
    debug_assert_eq!(mat.len(), n * n);
    debug_assert_eq!(rhs.len(), n);

    // Pivot threshold relative to the largest entry
    let scale = mat.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    let tiny = 1e-12 * scale;

    // Forward elimination
    for col in 0..n {
        let mut max_row = col;
        let mut max_val = mat[col * n + col].abs();
        for row in (col + 1)..n {
            let v = mat[row * n + col].abs();
            if v > max_val {
                max_val = v;
                max_row = row;
            }
        }
        if max_val < tiny {
            return None;
        }
        if max_row != col {
            for j in 0..n {
                mat.swap(col * n + j, max_row * n + j);
            }
            rhs.swap(col, max_row);
        }
        for row in (col + 1)..n {
            let factor = mat[row * n + col] / mat[col * n + col];
            for j in col..n {
                mat[row * n + j] -= factor * mat[col * n + j];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let mut acc = rhs[row];
        for j in (row + 1)..n {
            acc -= mat[row * n + j] * x[j];
        }
        x[row] = acc / mat[row * n + row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

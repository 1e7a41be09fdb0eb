//! Expected passing cost `E(a)`.
//!
//! Two sources of the same curve:
//! - [`MonteCarlo`]: sample mean of [`pair_cost`] over a frozen [`SpeedSample`].
//! - [`UniformAnalytic`]: the closed form for independent uniform speeds,
//!   `E(a) = a^4/3 + 2a^2 - 2a/3 + 1/6`.
//!
//! The closed form integrates the fast-lane branch over the density of
//! `vmin` (`2(1 - m)`) and the slow-lane branch over the joint density of
//! `(vmin, vmax)` (`2` on `vmin <= vmax`).

use serde::Serialize;

use crate::core::cost::pair_cost;
use crate::core::sampler::SpeedSample;

/// Ascending-power coefficients of the analytic quartic.
pub const ANALYTIC_COEFFS: [f64; 5] = [1.0 / 6.0, -2.0 / 3.0, 2.0, 0.0, 1.0 / 3.0];

/// Anything that can report `E(a)` for a shifted-frame threshold.
pub trait CostModel {
    fn expected_cost(&self, a: f64) -> f64;
}

/// One point of the estimated curve.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Estimate {
    pub threshold: f64,
    pub mean: f64,
    pub std_error: f64,
    pub n: usize,
}

/// Monte Carlo estimator bound to one frozen sample.
#[derive(Clone, Copy, Debug)]
pub struct MonteCarlo<'s> {
    sample: &'s SpeedSample,
}

impl<'s> MonteCarlo<'s> {
    pub fn new(sample: &'s SpeedSample) -> Self {
        Self { sample }
    }

    pub fn sample(&self) -> &'s SpeedSample {
        self.sample
    }

    /// Mean and standard error of the mean at `a` (Welford, single pass).
    pub fn estimate(&self, a: f64) -> Estimate {
        let mut n = 0usize;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        for p in self.sample.pairs() {
            let x = pair_cost(p.vmin(), p.vmax(), a);
            n += 1;
            let delta = x - mean;
            mean += delta / n as f64;
            m2 += delta * (x - mean);
        }
        let std_error = if n > 1 {
            (m2 / (n - 1) as f64 / n as f64).sqrt()
        } else {
            0.0
        };
        Estimate {
            threshold: a,
            mean,
            std_error,
            n,
        }
    }
}

impl CostModel for MonteCarlo<'_> {
    fn expected_cost(&self, a: f64) -> f64 {
        let pairs = self.sample.pairs();
        let total: f64 = pairs.iter().map(|p| pair_cost(p.vmin(), p.vmax(), a)).sum();
        total / pairs.len() as f64
    }
}

/// Closed-form `E(a)` for independent uniform speeds on the shifted frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformAnalytic;

impl UniformAnalytic {
    /// Fast-lane share: `(1 - a)^4 / 6`.
    pub fn fast_lane_term(a: f64) -> f64 {
        (1.0 - a).powi(4) / 6.0
    }

    /// Slow-lane share: `b^4/6 - 2b/3 + 1/2` with `b = 1 + a`.
    pub fn slow_lane_term(a: f64) -> f64 {
        let b = 1.0 + a;
        b.powi(4) / 6.0 - 2.0 * b / 3.0 + 0.5
    }

    /// `dE/da = 4a^3/3 + 4a - 2/3`.
    pub fn derivative(a: f64) -> f64 {
        4.0 * a.powi(3) / 3.0 + 4.0 * a - 2.0 / 3.0
    }

    /// Minimizer of `E(a)`: the real root of `2a^3 + 6a - 1 = 0`.
    ///
    /// `E''(a) = 4a^2 + 4 > 0`, so Newton from 0 is monotone and the root is
    /// unique.
    pub fn optimum() -> f64 {
        let mut a = 0.0f64;
        for _ in 0..50 {
            let f = 2.0 * a.powi(3) + 6.0 * a - 1.0;
            let df = 6.0 * a * a + 6.0;
            let step = f / df;
            a -= step;
            if step.abs() < 1e-15 {
                break;
            }
        }
        a
    }
}

impl CostModel for UniformAnalytic {
    fn expected_cost(&self, a: f64) -> f64 {
        Self::fast_lane_term(a) + Self::slow_lane_term(a)
    }
}

/// `n` evenly spaced thresholds on `[lo, hi]`, both ends included.
pub fn uniform_grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Evaluate the Monte Carlo estimator over a threshold grid.
pub fn estimate_grid(mc: &MonteCarlo<'_>, grid: &[f64]) -> Vec<Estimate> {
    grid.iter().map(|&a| mc.estimate(a)).collect()
}

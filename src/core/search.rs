//! One-dimensional threshold search on `[0, 1]`.
//!
//! Both strategies assume `E(a)` is unimodal. `Bisection` is the quick
//! heuristic: halve the interval and keep the lower half unless the midpoint
//! beats the current lower bound. It narrows fast but can shut the true
//! minimum out once `low` jumps past it. `GoldenSection` keeps the bracket
//! valid for any unimodal curve.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::estimator::CostModel;
use crate::error::{LanesplitError, Result};

const INV_PHI: f64 = 0.618_033_988_749_894_9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    Bisection,
    #[default]
    GoldenSection,
}

impl SearchStrategy {
    pub fn label(self) -> &'static str {
        match self {
            SearchStrategy::Bisection => "bisection",
            SearchStrategy::GoldenSection => "golden-section",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
}

impl Bracket {
    #[inline]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn mid(&self) -> f64 {
        0.5 * (self.low + self.high)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchTrace {
    pub strategy: SearchStrategy,
    pub steps: Vec<Bracket>,
    pub threshold: f64,
    pub cost: f64,
    pub evaluations: usize,
}

impl SearchTrace {
    pub fn final_bracket(&self) -> Option<Bracket> {
        self.steps.last().copied()
    }
}

/// Narrow `[low, high]` until its width drops below `tolerance`.
pub fn search<M: CostModel + ?Sized>(
    model: &M,
    strategy: SearchStrategy,
    low: f64,
    high: f64,
    tolerance: f64,
) -> Result<SearchTrace> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(LanesplitError::InvalidTolerance(tolerance));
    }
    let bracket = Bracket {
        low: low.min(high),
        high: low.max(high),
    };
    let trace = match strategy {
        SearchStrategy::Bisection => bisection(model, bracket, tolerance),
        SearchStrategy::GoldenSection => golden_section(model, bracket, tolerance),
    };
    Ok(trace)
}

fn bisection<M: CostModel + ?Sized>(model: &M, mut b: Bracket, tolerance: f64) -> SearchTrace {
    let mut steps = vec![b];
    let mut f_low = model.expected_cost(b.low);
    let mut evaluations = 1;
    while b.width() >= tolerance {
        let mid = b.mid();
        let f_mid = model.expected_cost(mid);
        evaluations += 1;
        if f_mid < f_low {
            b.low = mid;
            f_low = f_mid;
        } else {
            b.high = mid;
        }
        debug!(low = b.low, high = b.high, "bisection step");
        steps.push(b);
    }
    let threshold = b.low;
    SearchTrace {
        strategy: SearchStrategy::Bisection,
        steps,
        threshold,
        cost: f_low,
        evaluations,
    }
}

fn golden_section<M: CostModel + ?Sized>(
    model: &M,
    mut b: Bracket,
    tolerance: f64,
) -> SearchTrace {
    let mut steps = vec![b];
    let mut x1 = b.high - INV_PHI * b.width();
    let mut x2 = b.low + INV_PHI * b.width();
    let mut f1 = model.expected_cost(x1);
    let mut f2 = model.expected_cost(x2);
    let mut evaluations = 2;
    while b.width() >= tolerance {
        if f1 <= f2 {
            b.high = x2;
            x2 = x1;
            f2 = f1;
            x1 = b.high - INV_PHI * b.width();
            f1 = model.expected_cost(x1);
        } else {
            b.low = x1;
            x1 = x2;
            f1 = f2;
            x2 = b.low + INV_PHI * b.width();
            f2 = model.expected_cost(x2);
        }
        evaluations += 1;
        debug!(low = b.low, high = b.high, "golden-section step");
        steps.push(b);
    }
    let threshold = b.mid();
    let cost = model.expected_cost(threshold);
    evaluations += 1;
    SearchTrace {
        strategy: SearchStrategy::GoldenSection,
        steps,
        threshold,
        cost,
        evaluations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::estimator::UniformAnalytic;

    struct Parabola(f64);

    impl CostModel for Parabola {
        fn expected_cost(&self, a: f64) -> f64 {
            (a - self.0).powi(2)
        }
    }

    #[test]
    fn golden_section_finds_parabola_vertex() {
        let trace =
            search(&Parabola(0.37), SearchStrategy::GoldenSection, 0.0, 1.0, 1e-6).unwrap();
        assert!((trace.threshold - 0.37).abs() < 1e-6, "got {}", trace.threshold);
        assert!(trace.final_bracket().unwrap().width() < 1e-6);
    }

    #[test]
    fn golden_section_finds_analytic_optimum() {
        let trace =
            search(&UniformAnalytic, SearchStrategy::GoldenSection, 0.0, 1.0, 1e-6).unwrap();
        let expected = UniformAnalytic::optimum();
        assert!((trace.threshold - expected).abs() < 1e-5);
    }

    #[test]
    fn bisection_walks_up_a_decreasing_curve() {
        // every midpoint improves on `low`, so `low` climbs to the right edge
        let trace =
            search(&Parabola(1.0), SearchStrategy::Bisection, 0.0, 1.0, 1e-6).unwrap();
        assert!((trace.threshold - 1.0).abs() < 1e-5, "got {}", trace.threshold);
    }

    #[test]
    fn bisection_can_overshoot_the_minimum() {
        let trace =
            search(&UniformAnalytic, SearchStrategy::Bisection, 0.0, 1.0, 1e-3).unwrap();
        let b = trace.final_bracket().unwrap();
        assert!(b.width() < 1e-3);
        assert!(b.low >= 0.0 && b.high <= 1.0);
        // E(0.25) < E(0) lets `low` jump past a* ~ 0.165165 and stay there.
        assert!((trace.threshold - 0.25).abs() < 1e-3, "got {}", trace.threshold);
    }

    #[test]
    fn bounds_shrink_monotonically() {
        for strategy in [SearchStrategy::Bisection, SearchStrategy::GoldenSection] {
            let trace = search(&UniformAnalytic, strategy, 0.0, 1.0, 1e-4).unwrap();
            for w in trace.steps.windows(2) {
                assert!(w[1].low >= w[0].low && w[1].high <= w[0].high);
            }
        }
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tol in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let res = search(&UniformAnalytic, SearchStrategy::GoldenSection, 0.0, 1.0, tol);
            assert!(matches!(res, Err(LanesplitError::InvalidTolerance(_))));
        }
    }
}

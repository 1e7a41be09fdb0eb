//! End-to-end threshold study: sample → search → grid → fit.

use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::core::estimator::{
    ANALYTIC_COEFFS, CostModel, Estimate, MonteCarlo, UniformAnalytic, estimate_grid,
    uniform_grid,
};
use crate::core::polyfit::{Polynomial, fit_polynomial};
use crate::core::sampler::SpeedSample;
use crate::core::search::{SearchTrace, search};
use crate::core::speed::to_original;
use crate::error::Result;

/// One grid row: Monte Carlo estimate alongside the analytic and fitted curves.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GridPoint {
    pub estimate: Estimate,
    pub analytic: f64,
    pub fitted: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct StudyReport {
    pub sample_size: usize,
    pub seed: u64,
    pub search: SearchTrace,
    /// Search result in original speed units.
    pub threshold_original: f64,
    pub analytic_optimum: f64,
    pub analytic_optimum_cost: f64,
    pub fit: Polynomial,
    pub analytic_coeffs: Vec<f64>,
    pub coeff_deltas: Vec<f64>,
    pub grid: Vec<GridPoint>,
}

impl StudyReport {
    /// Largest `|estimate - analytic|` over the grid.
    pub fn max_analytic_gap(&self) -> f64 {
        self.grid
            .iter()
            .map(|g| (g.estimate.mean - g.analytic).abs())
            .fold(0.0, f64::max)
    }
}

pub fn run_study(cfg: &AppConfig) -> Result<StudyReport> {
    cfg.validate()?;
    let sample = SpeedSample::draw(cfg.sampling.sample_size, cfg.sampling.seed)?;
    run_study_on(cfg, &sample)
}

/// Same as [`run_study`] on a sample the caller already owns.
pub fn run_study_on(cfg: &AppConfig, sample: &SpeedSample) -> Result<StudyReport> {
    let mc = MonteCarlo::new(sample);

    let trace = search(
        &mc,
        cfg.search.strategy,
        cfg.search.low,
        cfg.search.high,
        cfg.search.tolerance,
    )?;
    info!(
        strategy = trace.strategy.label(),
        threshold = trace.threshold,
        cost = trace.cost,
        evaluations = trace.evaluations,
        "search finished"
    );
    for (step, b) in trace.steps.iter().enumerate() {
        info!("step {step:>3}: [{:.6}, {:.6}]", b.low, b.high);
    }

    let thresholds = uniform_grid(0.0, 1.0, cfg.fit.grid_points);
    let estimates = estimate_grid(&mc, &thresholds);
    let points: Vec<(f64, f64)> = estimates.iter().map(|e| (e.threshold, e.mean)).collect();
    let fit = fit_polynomial(&points, cfg.fit.degree)?;
    let coeff_deltas = fit.coeff_deltas(&ANALYTIC_COEFFS);
    info!(degree = fit.degree(), rmse = fit.rmse, "fitted cost curve");
    info!("fitted coeffs:   {:?}", fit.coeffs);
    info!("analytic coeffs: {:?}", ANALYTIC_COEFFS);

    let grid = estimates
        .into_iter()
        .map(|estimate| GridPoint {
            analytic: UniformAnalytic.expected_cost(estimate.threshold),
            fitted: fit.eval(estimate.threshold),
            estimate,
        })
        .collect();

    let analytic_optimum = UniformAnalytic::optimum();
    Ok(StudyReport {
        sample_size: sample.len(),
        seed: sample.seed(),
        threshold_original: to_original(trace.threshold),
        search: trace,
        analytic_optimum,
        analytic_optimum_cost: UniformAnalytic.expected_cost(analytic_optimum),
        fit,
        analytic_coeffs: ANALYTIC_COEFFS.to_vec(),
        coeff_deltas,
        grid,
    })
}

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use lanesplit::config::AppConfig;
use lanesplit::core::search::SearchStrategy;

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum StrategyArg {
    Bisection,
    Golden,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Bisection => SearchStrategy::Bisection,
            StrategyArg::Golden => SearchStrategy::GoldenSection,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (created with commented defaults if missing)
    #[arg(long, default_value = "lanesplit.toml")]
    pub config: String,

    /// RNG seed for the speed sample (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of speed pairs to draw (overrides config)
    #[arg(long)]
    pub samples: Option<usize>,

    /// Threshold search strategy (overrides config)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Stop once the search interval is narrower than this (overrides config)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Thresholds evaluated for the polynomial fit (overrides config)
    #[arg(long)]
    pub grid_points: Option<usize>,

    /// Polynomial degree (overrides config)
    #[arg(long)]
    pub degree: Option<usize>,

    /// Output directory for CSV and PNG (overrides config)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Skip writing CSV and PNG
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,

    /// Print the full report as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Args {
    pub fn apply_overrides(&self, cfg: &mut AppConfig) {
        if let Some(seed) = self.seed {
            cfg.sampling.seed = seed;
        }
        if let Some(n) = self.samples {
            cfg.sampling.sample_size = n;
        }
        if let Some(strategy) = self.strategy {
            cfg.search.strategy = strategy.into();
        }
        if let Some(tol) = self.tolerance {
            cfg.search.tolerance = tol;
        }
        if let Some(n) = self.grid_points {
            cfg.fit.grid_points = n;
        }
        if let Some(d) = self.degree {
            cfg.fit.degree = d;
        }
        if let Some(dir) = &self.out_dir {
            cfg.output.out_dir = dir.clone();
        }
        if self.no_plot {
            cfg.output.write_csv = false;
            cfg.output.write_plot = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from([
            "lanesplit",
            "--seed",
            "9",
            "--samples",
            "1000",
            "--strategy",
            "bisection",
            "--no-plot",
        ]);
        let mut cfg = AppConfig::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.sampling.seed, 9);
        assert_eq!(cfg.sampling.sample_size, 1000);
        assert_eq!(cfg.search.strategy, SearchStrategy::Bisection);
        assert!(!cfg.output.write_csv && !cfg.output.write_plot);
        assert_eq!(cfg.fit.degree, 4);
    }
}

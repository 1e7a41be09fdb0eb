// Entry point: loads config, runs the threshold study, writes CSV/PNG.
mod cli;

use clap::Parser;
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lanesplit::config::AppConfig;
use lanesplit::core::speed::to_original;
use lanesplit::report::{write_csv, write_plot};
use lanesplit::study::run_study;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lanesplit=info")),
        )
        .with_target(false)
        .init();

    let args = cli::Args::parse();
    let mut cfg = AppConfig::load_or_default(&args.config);
    args.apply_overrides(&mut cfg);
    info!(
        samples = cfg.sampling.sample_size,
        seed = cfg.sampling.seed,
        strategy = cfg.search.strategy.label(),
        "running threshold study"
    );

    let report = run_study(&cfg)?;

    if cfg.output.write_csv {
        write_csv(&cfg.output.out_dir, &report)?;
    }
    if cfg.output.write_plot {
        write_plot(&cfg.output.out_dir, &report)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "threshold a = {:.6} (original units {:.6}), E(a) = {:.6}",
            report.search.threshold, report.threshold_original, report.search.cost
        );
        println!(
            "analytic a* = {:.6} (original units {:.6}), E(a*) = {:.6}",
            report.analytic_optimum,
            to_original(report.analytic_optimum),
            report.analytic_optimum_cost
        );
        println!(
            "fit rmse = {:.3e}, max |MC - analytic| = {:.3e}",
            report.fit.rmse,
            report.max_analytic_gap()
        );
    }
    Ok(())
}

use std::error::Error;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::error::{LanesplitError, Result};
use crate::study::{GridPoint, StudyReport};

pub const CSV_FILE: &str = "cost_grid.csv";
pub const PLOT_FILE: &str = "cost_curve.png";

/// `a,estimate,std_error,analytic,fitted`, one row per grid threshold.
pub fn grid_csv(grid: &[GridPoint]) -> String {
    let mut csv = String::from("a,estimate,std_error,analytic,fitted\n");
    for g in grid {
        csv.push_str(&format!(
            "{:.6},{:.8},{:.8},{:.8},{:.8}\n",
            g.estimate.threshold, g.estimate.mean, g.estimate.std_error, g.analytic, g.fitted
        ));
    }
    csv
}

pub fn write_csv(out_dir: &Path, report: &StudyReport) -> Result<PathBuf> {
    create_dir_all(out_dir)?;
    let path = out_dir.join(CSV_FILE);
    write(&path, grid_csv(&report.grid))?;
    info!("wrote {}", path.display());
    Ok(path)
}

pub fn write_plot(out_dir: &Path, report: &StudyReport) -> Result<PathBuf> {
    create_dir_all(out_dir)?;
    let path = out_dir.join(PLOT_FILE);
    render_cost_plot(&path, report).map_err(|e| LanesplitError::Plot(e.to_string()))?;
    info!("wrote {}", path.display());
    Ok(path)
}

fn render_cost_plot(
    out_path: &Path,
    report: &StudyReport,
) -> std::result::Result<(), Box<dyn Error>> {
    let est_points: Vec<(f64, f64)> = report
        .grid
        .iter()
        .map(|g| (g.estimate.threshold, g.estimate.mean))
        .collect();
    let analytic_points: Vec<(f64, f64)> = report
        .grid
        .iter()
        .map(|g| (g.estimate.threshold, g.analytic))
        .collect();
    let fit_points: Vec<(f64, f64)> = report
        .grid
        .iter()
        .map(|g| (g.estimate.threshold, g.fitted))
        .collect();

    let y_max = report
        .grid
        .iter()
        .flat_map(|g| [g.estimate.mean, g.analytic, g.fitted])
        .filter(|y| y.is_finite())
        .fold(0.0f64, f64::max)
        .max(1e-6)
        * 1.05;

    let root = BitMapBackend::new(out_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Expected passing cost E(a) | n = {} | {}",
                report.sample_size,
                report.search.strategy.label()
            ),
            ("sans-serif", 22),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..1.0f64, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("threshold a (shifted frame)")
        .y_desc("expected distance lost")
        .draw()?;

    chart
        .draw_series(
            est_points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLUE.filled())),
        )?
        .label("Monte Carlo")
        .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(analytic_points, &BLACK))?
        .label("analytic quartic")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .draw_series(LineSeries::new(fit_points, &RED))?
        .label(format!("degree-{} fit", report.fit.degree()))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    let found = report.search.threshold;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(found, 0.0), (found, y_max)],
        RED.mix(0.4),
    )))?;
    let best = report.analytic_optimum;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(best, 0.0), (best, y_max)],
        BLACK.mix(0.3),
    )))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::estimator::Estimate;

    #[test]
    fn csv_has_header_and_one_row_per_point() {
        let grid = vec![
            GridPoint {
                estimate: Estimate {
                    threshold: 0.0,
                    mean: 0.1667,
                    std_error: 0.001,
                    n: 10,
                },
                analytic: 1.0 / 6.0,
                fitted: 0.1666,
            },
            GridPoint {
                estimate: Estimate {
                    threshold: 0.5,
                    mean: 0.354,
                    std_error: 0.002,
                    n: 10,
                },
                analytic: 0.3541,
                fitted: 0.3542,
            },
        ];
        let csv = grid_csv(&grid);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "a,estimate,std_error,analytic,fitted");
        assert!(lines[2].starts_with("0.500000,0.35400000,"));
    }
}

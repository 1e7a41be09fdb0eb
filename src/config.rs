use crate::core::search::SearchStrategy;
use crate::error::{LanesplitError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "SamplingConfig::default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "SamplingConfig::default_seed")]
    pub seed: u64,
}

impl SamplingConfig {
    fn default_sample_size() -> usize {
        200_000
    }
    fn default_seed() -> u64 {
        42
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size: Self::default_sample_size(),
            seed: Self::default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub strategy: SearchStrategy,
    #[serde(default = "SearchConfig::default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "SearchConfig::default_low")]
    pub low: f64,
    #[serde(default = "SearchConfig::default_high")]
    pub high: f64,
}

impl SearchConfig {
    fn default_tolerance() -> f64 {
        1e-3
    }
    fn default_low() -> f64 {
        0.0
    }
    fn default_high() -> f64 {
        1.0
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            tolerance: Self::default_tolerance(),
            low: Self::default_low(),
            high: Self::default_high(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    #[serde(default = "FitConfig::default_grid_points")]
    pub grid_points: usize,
    #[serde(default = "FitConfig::default_degree")]
    pub degree: usize,
}

impl FitConfig {
    fn default_grid_points() -> usize {
        101
    }
    fn default_degree() -> usize {
        4
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            grid_points: Self::default_grid_points(),
            degree: Self::default_degree(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "OutputConfig::default_true")]
    pub write_csv: bool,
    #[serde(default = "OutputConfig::default_true")]
    pub write_plot: bool,
}

impl OutputConfig {
    fn default_out_dir() -> PathBuf {
        PathBuf::from("target/plots/lanesplit")
    }
    fn default_true() -> bool {
        true
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: Self::default_out_dir(),
            write_csv: true,
            write_plot: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fit: FitConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.sampling.sample_size == 0 {
            return Err(LanesplitError::InvalidConfig(
                "sampling.sample_size must be > 0".into(),
            ));
        }
        let s = &self.search;
        if !(0.0..=1.0).contains(&s.low) || !(0.0..=1.0).contains(&s.high) || s.low >= s.high {
            return Err(LanesplitError::InvalidConfig(format!(
                "search bounds must satisfy 0 <= low < high <= 1, got [{}, {}]",
                s.low, s.high
            )));
        }
        if !(s.tolerance.is_finite() && s.tolerance > 0.0) {
            return Err(LanesplitError::InvalidTolerance(s.tolerance));
        }
        if self.fit.grid_points <= self.fit.degree {
            return Err(LanesplitError::InvalidConfig(format!(
                "fit.grid_points ({}) must exceed fit.degree ({})",
                self.fit.grid_points, self.fit.degree
            )));
        }
        Ok(())
    }

    /// Read `path`, or write commented defaults there and return them.
    ///
    /// Read and parse failures fall back to defaults with a warning.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => warn!("Failed to parse config {path}: {err}. Using defaults."),
                },
                Err(err) => warn!("Failed to read config {path}: {err}. Using defaults."),
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, comment_out_values(&text)) {
                    warn!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}"),
        }
        default_cfg
    }
}

/// Keep section headers, prefix every key line with `# `.
fn comment_out_values(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
            out.push_str("# ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "lanesplit_config_test_{}_{}",
            name,
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    #[test]
    fn load_or_default_writes_defaults_cleanly() {
        let path = unique_path("defaults.toml");
        let path_str = path.to_string_lossy().to_string();
        let _ = fs::remove_file(&path);

        let cfg = AppConfig::load_or_default(&path_str);
        assert!(path.exists(), "config file should be created");
        assert_eq!(cfg.sampling.sample_size, 200_000);
        assert_eq!(cfg.sampling.seed, 42);
        assert_eq!(cfg.search.strategy, SearchStrategy::GoldenSection);
        assert_eq!(cfg.search.tolerance, 1e-3);
        assert_eq!(cfg.fit.grid_points, 101);
        assert_eq!(cfg.fit.degree, 4);

        let contents = fs::read_to_string(&path).expect("read written config");
        assert!(contents.contains("[sampling]"), "headers stay live");
        assert!(
            contents.contains("# sample_size = 200000"),
            "values are commented out: {contents}"
        );
        assert!(contents.contains("# strategy = \"golden-section\""));

        // the commented file parses back to defaults
        let again = AppConfig::load_or_default(&path_str);
        assert_eq!(again.sampling.sample_size, 200_000);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_or_default_reads_partial_file() {
        let path = unique_path("partial.toml");
        let path_str = path.to_string_lossy().to_string();
        fs::write(
            &path,
            "[sampling]\nseed = 7\n\n[search]\nstrategy = \"bisection\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.sampling.seed, 7);
        assert_eq!(cfg.sampling.sample_size, 200_000);
        assert_eq!(cfg.search.strategy, SearchStrategy::Bisection);
        assert_eq!(cfg.fit.degree, 4);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = unique_path("broken.toml");
        let path_str = path.to_string_lossy().to_string();
        fs::write(&path, "[sampling\nseed = ").unwrap();

        let cfg = AppConfig::load_or_default(&path_str);
        assert_eq!(cfg.sampling.seed, 42);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        assert!(AppConfig::default().validate().is_ok());

        let mut cfg = AppConfig::default();
        cfg.search.low = 0.8;
        cfg.search.high = 0.2;
        assert!(matches!(cfg.validate(), Err(LanesplitError::InvalidConfig(_))));

        let mut cfg = AppConfig::default();
        cfg.search.tolerance = 0.0;
        assert!(matches!(cfg.validate(), Err(LanesplitError::InvalidTolerance(_))));

        let mut cfg = AppConfig::default();
        cfg.fit.grid_points = 4;
        assert!(matches!(cfg.validate(), Err(LanesplitError::InvalidConfig(_))));

        let mut cfg = AppConfig::default();
        cfg.sampling.sample_size = 0;
        assert!(cfg.validate().is_err());
    }
}

use crate::error::{Result, ScaleplotError};
use crate::plot::PlotMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LABEL_PLACEHOLDER: &str = "{label}";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub runs: RunConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub labels: Vec<String>,
    pub resolutions: Vec<f64>,
    pub file_pattern: String,
    pub box_volume: f64,
    pub axis: Axis,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlotConfig {
    pub mode: PlotMode,
    pub output_path: PathBuf,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

/// Which quantity of a run goes on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Particle count derived from the resolution, `box_volume / h^3`
    Particles,
    /// The resolution `h` itself
    Resolution,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            labels: ('a'..='g').map(String::from).collect(),
            resolutions: vec![0.17, 0.15, 0.13, 0.11, 0.09, 0.07, 0.05],
            file_pattern: "sph_outputs_particles/sph_{label}.out".to_string(),
            box_volume: 1.0, // 1x1x1 box
            axis: Axis::Particles,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            mode: PlotMode::LogLog,
            output_path: PathBuf::from("scaling_plot_particles.png"),
            title: "Log-Log Number of Particles vs. Execution Time (Parallel)".to_string(),
            x_label: "Log Number of Particles".to_string(),
            y_label: "Log Execution Time (seconds)".to_string(),
            // 10x6 inch figure at 100 dpi
            width: 1000,
            height: 600,
            report_path: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScaleplotError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ScaleplotError::Config {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ScaleplotError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["scaleplot.toml", ".scaleplot.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref pattern) = cli_args.file_pattern {
            self.runs.file_pattern = pattern.clone();
        }

        if let Some(axis) = cli_args.axis {
            self.runs.axis = axis;
        }

        if let Some(mode) = cli_args.mode {
            self.plot.mode = mode;
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.plot.output_path = output_path.clone();
        }

        if let Some(ref report_path) = cli_args.report_path {
            self.plot.report_path = Some(report_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.runs.labels.is_empty() {
            return Err(ScaleplotError::Config {
                message: "At least one run label must be specified".to_string(),
            });
        }

        if self.runs.labels.len() != self.runs.resolutions.len() {
            return Err(ScaleplotError::Config {
                message: format!(
                    "Got {} labels but {} resolutions",
                    self.runs.labels.len(),
                    self.runs.resolutions.len()
                ),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for label in &self.runs.labels {
            if label.is_empty() {
                return Err(ScaleplotError::Config {
                    message: "Run labels cannot be empty".to_string(),
                });
            }
            if !seen.insert(label.as_str()) {
                return Err(ScaleplotError::Config {
                    message: format!("Duplicate run label: {}", label),
                });
            }
        }

        if let Some(h) = self
            .runs
            .resolutions
            .iter()
            .find(|h| !(h.is_finite() && **h > 0.0))
        {
            return Err(ScaleplotError::Config {
                message: format!("Resolutions must be positive, got {}", h),
            });
        }

        if !(self.runs.box_volume.is_finite() && self.runs.box_volume > 0.0) {
            return Err(ScaleplotError::Config {
                message: "Box volume must be greater than 0".to_string(),
            });
        }

        if !self.runs.file_pattern.contains(LABEL_PLACEHOLDER) {
            return Err(ScaleplotError::InvalidPattern {
                pattern: self.runs.file_pattern.clone(),
            });
        }

        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(ScaleplotError::Config {
                message: "Plot width and height must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub file_pattern: Option<String>,
    pub axis: Option<Axis>,
    pub mode: Option<PlotMode>,
    pub output_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_pattern(mut self, pattern: Option<String>) -> Self {
        self.file_pattern = pattern;
        self
    }

    pub fn with_axis(mut self, axis: Option<Axis>) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_mode(mut self, mode: Option<PlotMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_report_path(mut self, report_path: Option<PathBuf>) -> Self {
        self.report_path = report_path;
        self
    }
}

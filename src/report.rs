use crate::aggregator::{Aggregation, ResultSet, SkippedRun};
use crate::config::{Axis, Config};
use crate::error::{Result, ScaleplotError};
use crate::plot::PlotMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingReport {
    pub generated_at: DateTime<Utc>,
    pub measurements: ResultSet,
    pub skipped: Vec<SkippedRun>,
    pub plot: PlotSummary,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSummary {
    pub mode: PlotMode,
    pub output_path: PathBuf,
    pub rendered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub labels: Vec<String>,
    pub resolutions: Vec<f64>,
    pub file_pattern: String,
    pub box_volume: f64,
    pub axis: Axis,
}

impl From<&Config> for ConfigSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            labels: config.runs.labels.clone(),
            resolutions: config.runs.resolutions.clone(),
            file_pattern: config.runs.file_pattern.clone(),
            box_volume: config.runs.box_volume,
            axis: config.runs.axis,
        }
    }
}

impl ScalingReport {
    pub fn new(aggregation: &Aggregation, config: &Config, rendered: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            measurements: aggregation.results.clone(),
            skipped: aggregation.skipped.clone(),
            plot: PlotSummary {
                mode: config.plot.mode,
                output_path: config.plot.output_path.clone(),
                rendered,
            },
            config_used: ConfigSnapshot::from(config),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScaleplotError::Serialization {
            message: format!("Failed to serialize report to JSON: {}", e),
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_json()?)?;
        log::debug!("wrote report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{Measurement, SkipReason};
    use tempfile::TempDir;

    fn sample_aggregation() -> Aggregation {
        let mut results = ResultSet::new();
        results.insert(Measurement {
            label: "a".to_string(),
            independent: 203.0,
            seconds: 1.5,
            source: PathBuf::from("sph_outputs_particles/sph_a.out"),
        });

        Aggregation {
            results,
            skipped: vec![SkippedRun {
                label: "b".to_string(),
                path: PathBuf::from("sph_outputs_particles/sph_b.out"),
                reason: SkipReason::MissingFile,
            }],
        }
    }

    #[test]
    fn test_report_json() {
        let report = ScalingReport::new(&sample_aggregation(), &Config::default(), true);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["measurements"][0]["independent"], 203.0);
        assert_eq!(json["skipped"][0]["reason"], "missing_file");
        assert_eq!(json["plot"]["mode"], "loglog");
        assert_eq!(json["config_used"]["axis"], "particles");
    }

    #[test]
    fn test_save_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("scaling.json");
        let report = ScalingReport::new(&sample_aggregation(), &Config::default(), false);

        report.save_json(&path).unwrap();

        let loaded: ScalingReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.measurements, report.measurements);
        assert!(!loaded.plot.rendered);
    }
}

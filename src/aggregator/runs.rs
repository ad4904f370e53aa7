use crate::aggregator::{Measurement, ResultSet};
use crate::config::{Axis, RunConfig, LABEL_PLACEHOLDER};
use crate::error::{Result, ScaleplotError};
use crate::extractor::TimingExtractor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingFile,
    NoTiming,
    Unmapped,
}

/// A run that produced no measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRun {
    pub label: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl SkippedRun {
    pub fn diagnostic(&self) -> String {
        match self.reason {
            SkipReason::MissingFile => format!("{} does not exist", self.path.display()),
            SkipReason::NoTiming => format!("Could not get time from {}", self.path.display()),
            SkipReason::Unmapped => format!(
                "No independent variable configured for label {}",
                self.label
            ),
        }
    }
}

impl fmt::Display for SkippedRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub results: ResultSet,
    pub skipped: Vec<SkippedRun>,
}

/// Number of cubic cells of side `h` that fit in a box of `box_volume`,
/// truncated towards zero.
pub fn particle_count(h: f64, box_volume: f64) -> u64 {
    let vol_particle = h.powf(3.0);
    (box_volume / vol_particle) as u64
}

/// Substitutes `label` for every placeholder in `file_pattern`.
pub fn resolve_path(file_pattern: &str, label: &str) -> PathBuf {
    PathBuf::from(file_pattern.replace(LABEL_PLACEHOLDER, label))
}

/// Ordered run labels and the x-axis value each one maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTable {
    labels: Vec<String>,
    independent: HashMap<String, f64>,
}

impl RunTable {
    pub fn from_config(runs: &RunConfig) -> Self {
        let independent = runs
            .labels
            .iter()
            .zip(&runs.resolutions)
            .map(|(label, &h)| {
                let value = match runs.axis {
                    Axis::Particles => particle_count(h, runs.box_volume) as f64,
                    Axis::Resolution => h,
                };
                (label.clone(), value)
            })
            .collect();

        Self {
            labels: runs.labels.clone(),
            independent,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn value_for(&self, label: &str) -> Option<f64> {
        self.independent.get(label).copied()
    }

    /// Like [`build_results`], additionally calling `on_run` with each label
    /// once it has been handled.
    pub fn collect(
        &self,
        file_pattern: &str,
        on_skip: Option<&dyn Fn(&SkippedRun)>,
        on_run: Option<&dyn Fn(&str)>,
    ) -> Result<Aggregation> {
        aggregate(&self.labels, &self.independent, file_pattern, on_skip, on_run)
    }
}

/// Reads the timing of every labelled run, in label order.
///
/// Missing files, files without a timing line and labels without an
/// independent value are skipped and reported through `on_skip`, once per
/// label. Only a failure to read an existing file aborts the pass.
pub fn build_results(
    labels: &[String],
    independent: &HashMap<String, f64>,
    file_pattern: &str,
    on_skip: Option<&dyn Fn(&SkippedRun)>,
) -> Result<Aggregation> {
    aggregate(labels, independent, file_pattern, on_skip, None)
}

fn aggregate(
    labels: &[String],
    independent: &HashMap<String, f64>,
    file_pattern: &str,
    on_skip: Option<&dyn Fn(&SkippedRun)>,
    on_run: Option<&dyn Fn(&str)>,
) -> Result<Aggregation> {
    if !file_pattern.contains(LABEL_PLACEHOLDER) {
        return Err(ScaleplotError::InvalidPattern {
            pattern: file_pattern.to_string(),
        });
    }

    let extractor = TimingExtractor::new()?;
    let mut aggregation = Aggregation::default();

    for label in labels {
        let out_file = resolve_path(file_pattern, label);

        let skip = match independent.get(label) {
            None => Some(SkipReason::Unmapped),
            Some(_) if !out_file.exists() => Some(SkipReason::MissingFile),
            Some(&value) => match extractor.extract_seconds(&out_file)? {
                Some(seconds) => {
                    let replaced = aggregation.results.insert(Measurement {
                        label: label.clone(),
                        independent: value,
                        seconds,
                        source: out_file.clone(),
                    });
                    if let Some(previous) = replaced {
                        log::debug!(
                            "label {} overwrote {} -> {} at x = {}",
                            label,
                            previous,
                            seconds,
                            value
                        );
                    }
                    None
                }
                None => Some(SkipReason::NoTiming),
            },
        };

        if let Some(reason) = skip {
            let skipped = SkippedRun {
                label: label.clone(),
                path: out_file,
                reason,
            };
            if let Some(callback) = on_skip {
                callback(&skipped);
            }
            aggregation.skipped.push(skipped);
        }

        if let Some(callback) = on_run {
            callback(label);
        }
    }

    Ok(aggregation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    fn pattern_in(dir: &TempDir) -> String {
        format!("{}/sph_{{label}}.out", dir.path().display())
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn mapping(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_particle_count() {
        assert_eq!(particle_count(0.17, 1.0), (1.0 / 0.17f64.powf(3.0)) as u64);
        assert_eq!(particle_count(0.17, 1.0), 203);
        assert_eq!(particle_count(0.09, 1.0), 1371);
        assert_eq!(particle_count(0.5, 2.0), 16);
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path("sph_outputs_particles/sph_{label}.out", "c"),
            PathBuf::from("sph_outputs_particles/sph_c.out")
        );
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = pattern_in(&temp_dir);
        let messages = RefCell::new(Vec::new());
        let on_skip = |s: &SkippedRun| messages.borrow_mut().push(s.diagnostic());

        let aggregation = build_results(
            &labels(&["a"]),
            &mapping(&[("a", 5.0)]),
            &pattern,
            Some(&on_skip),
        )
        .unwrap();

        let expected_path = temp_dir.path().join("sph_a.out");
        assert!(aggregation.results.is_empty());
        assert!(!aggregation.results.contains_key(5.0));
        assert_eq!(
            messages.into_inner(),
            vec![format!("{} does not exist", expected_path.display())]
        );
        assert_eq!(aggregation.skipped[0].reason, SkipReason::MissingFile);
    }

    #[test]
    fn test_mixed_runs() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_a.out"), "Ran in 1.0 seconds\n").unwrap();
        fs::write(temp_dir.path().join("sph_c.out"), "Ran in 3.0 seconds\n").unwrap();

        let aggregation = build_results(
            &labels(&["a", "b", "c"]),
            &mapping(&[("a", 5.0), ("b", 2.0), ("c", 1.0)]),
            &pattern_in(&temp_dir),
            None,
        )
        .unwrap();

        assert_eq!(aggregation.results.points(), vec![(5.0, 1.0), (1.0, 3.0)]);
        assert!(!aggregation.results.contains_key(2.0));
        assert_eq!(aggregation.skipped.len(), 1);
        assert_eq!(aggregation.skipped[0].label, "b");
    }

    #[test]
    fn test_unmatched_content_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sph_a.out");
        fs::write(&path, "killed by signal 9\n").unwrap();

        let count = RefCell::new(0);
        let on_skip = |_: &SkippedRun| *count.borrow_mut() += 1;

        let aggregation = build_results(
            &labels(&["a"]),
            &mapping(&[("a", 5.0)]),
            &pattern_in(&temp_dir),
            Some(&on_skip),
        )
        .unwrap();

        assert!(aggregation.results.is_empty());
        assert_eq!(*count.borrow(), 1);
        assert_eq!(
            aggregation.skipped[0].diagnostic(),
            format!("Could not get time from {}", path.display())
        );
    }

    #[test]
    fn test_unmapped_label_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_z.out"), "Ran in 1.0 seconds\n").unwrap();

        let aggregation = build_results(
            &labels(&["z"]),
            &HashMap::new(),
            &pattern_in(&temp_dir),
            None,
        )
        .unwrap();

        assert!(aggregation.results.is_empty());
        assert_eq!(aggregation.skipped[0].reason, SkipReason::Unmapped);
    }

    #[test]
    fn test_all_missing_gives_empty_results() {
        let temp_dir = TempDir::new().unwrap();
        let table = RunTable::from_config(&RunConfig::default());

        let aggregation = table.collect(&pattern_in(&temp_dir), None, None).unwrap();

        assert!(aggregation.results.is_empty());
        assert_eq!(aggregation.skipped.len(), 7);
    }

    #[test]
    fn test_unreadable_output_aborts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_b.out"), "Ran in 2.0 seconds\n").unwrap();
        fs::create_dir(temp_dir.path().join("sph_a.out")).unwrap();

        let count = RefCell::new(0);
        let on_skip = |_: &SkippedRun| *count.borrow_mut() += 1;

        let result = build_results(
            &labels(&["a", "b"]),
            &mapping(&[("a", 5.0), ("b", 2.0)]),
            &pattern_in(&temp_dir),
            Some(&on_skip),
        );

        match result {
            Err(ScaleplotError::ReadFailed { path, .. }) => assert!(path.ends_with("sph_a.out")),
            other => panic!("expected ReadFailed, got {:?}", other),
        }
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_collect_reports_every_label() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_c.out"), "Ran in 3.0 seconds\n").unwrap();
        fs::write(temp_dir.path().join("sph_e.out"), "no timing\n").unwrap();
        let table = RunTable::from_config(&RunConfig::default());

        let seen = RefCell::new(Vec::new());
        let on_run = |label: &str| seen.borrow_mut().push(label.to_string());

        let aggregation = table
            .collect(&pattern_in(&temp_dir), None, Some(&on_run))
            .unwrap();

        assert_eq!(seen.into_inner(), vec!["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(aggregation.results.len(), 1);
        assert_eq!(aggregation.skipped.len(), 6);
    }

    #[test]
    fn test_duplicate_keys_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_a.out"), "Ran in 1.0 seconds\n").unwrap();
        fs::write(temp_dir.path().join("sph_b.out"), "Ran in 2.0 seconds\n").unwrap();

        let aggregation = build_results(
            &labels(&["a", "b"]),
            &mapping(&[("a", 7.0), ("b", 7.0)]),
            &pattern_in(&temp_dir),
            None,
        )
        .unwrap();

        assert_eq!(aggregation.results.points(), vec![(7.0, 2.0)]);
        assert!(aggregation.skipped.is_empty());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("sph_a.out"), "Ran in 4.5 seconds\n").unwrap();
        fs::write(temp_dir.path().join("sph_d.out"), "no timing\n").unwrap();
        let table = RunTable::from_config(&RunConfig::default());
        let pattern = pattern_in(&temp_dir);

        let first = table.collect(&pattern, None, None).unwrap();
        let second = table.collect(&pattern, None, None).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.results.points(), vec![(203.0, 4.5)]);
    }

    #[test]
    fn test_resolution_axis() {
        let runs = RunConfig {
            axis: Axis::Resolution,
            ..RunConfig::default()
        };
        let table = RunTable::from_config(&runs);

        assert_eq!(table.labels().len(), 7);
        assert_eq!(table.value_for("a"), Some(0.17));
        assert_eq!(table.value_for("g"), Some(0.05));
    }

    #[test]
    fn test_particle_axis() {
        let table = RunTable::from_config(&RunConfig::default());
        assert_eq!(table.value_for("a"), Some(203.0));
        assert_eq!(table.value_for("b"), Some(296.0));
        assert_eq!(table.value_for("h"), None);
    }

    #[test]
    fn test_pattern_without_placeholder() {
        let result = build_results(
            &labels(&["a"]),
            &mapping(&[("a", 1.0)]),
            "outputs/run.out",
            None,
        );
        assert!(matches!(result, Err(ScaleplotError::InvalidPattern { .. })));
    }
}

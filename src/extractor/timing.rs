use crate::error::{Result, ScaleplotError};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Matches the summary line a simulation prints when it finishes,
/// e.g. `Ran in 12.34 seconds`. Digits are ASCII only, so every capture
/// parses as `f64`.
pub const TIMING_PATTERN: &str = r"Ran in ([0-9]+\.[0-9]+) seconds";

pub struct TimingExtractor {
    pattern: Regex,
}

impl TimingExtractor {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(TIMING_PATTERN).map_err(|e| ScaleplotError::Config {
            message: format!("Invalid timing pattern: {}", e),
        })?;

        Ok(Self { pattern })
    }

    /// Returns the elapsed seconds of the first timing line in `text`.
    pub fn parse_seconds(&self, text: &str) -> Option<f64> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }

    /// Reads the whole file and looks for a timing line in it.
    ///
    /// A file without a timing line yields `Ok(None)`; only a failed read is
    /// an error.
    pub fn extract_seconds<P: AsRef<Path>>(&self, path: P) -> Result<Option<f64>> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| ScaleplotError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;

        let seconds = self.parse_seconds(&data);
        log::debug!("{}: timing {:?}", path.display(), seconds);
        Ok(seconds)
    }
}

/// Convenience wrapper around [`TimingExtractor::extract_seconds`].
pub fn extract_seconds<P: AsRef<Path>>(path: P) -> Result<Option<f64>> {
    TimingExtractor::new()?.extract_seconds(path)
}

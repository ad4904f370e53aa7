use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One timing read from a run output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub label: String,
    pub independent: f64,
    pub seconds: f64,
    pub source: PathBuf,
}

/// Timings keyed by independent variable, in insertion order.
///
/// Keys are unique. Inserting a key that is already present replaces its
/// value but keeps its original position, so iteration always follows the
/// order in which keys were first seen rather than numeric order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    measurements: Vec<Measurement>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a measurement and returns the seconds it replaced, if any.
    pub fn insert(&mut self, measurement: Measurement) -> Option<f64> {
        match self
            .measurements
            .iter_mut()
            .find(|m| m.independent == measurement.independent)
        {
            Some(existing) => {
                let previous = existing.seconds;
                *existing = measurement;
                Some(previous)
            }
            None => {
                self.measurements.push(measurement);
                None
            }
        }
    }

    pub fn get(&self, independent: f64) -> Option<f64> {
        self.measurements
            .iter()
            .find(|m| m.independent == independent)
            .map(|m| m.seconds)
    }

    pub fn contains_key(&self, independent: f64) -> bool {
        self.get(independent).is_some()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.measurements.iter()
    }

    pub fn keys(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.independent).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.seconds).collect()
    }

    /// `(independent, seconds)` pairs, ready for plotting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.measurements
            .iter()
            .map(|m| (m.independent, m.seconds))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(label: &str, independent: f64, seconds: f64) -> Measurement {
        Measurement {
            label: label.to_string(),
            independent,
            seconds,
            source: PathBuf::from(format!("sph_{}.out", label)),
        }
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut results = ResultSet::new();
        results.insert(measurement("a", 203.0, 1.5));
        results.insert(measurement("b", 8.0, 0.2));
        results.insert(measurement("c", 455.0, 3.1));

        assert_eq!(results.keys(), vec![203.0, 8.0, 455.0]);
        assert_eq!(results.values(), vec![1.5, 0.2, 3.1]);
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let mut results = ResultSet::new();
        assert_eq!(results.insert(measurement("a", 10.0, 1.0)), None);
        results.insert(measurement("b", 20.0, 2.0));
        assert_eq!(results.insert(measurement("c", 10.0, 5.0)), Some(1.0));

        assert_eq!(results.len(), 2);
        assert_eq!(results.points(), vec![(10.0, 5.0), (20.0, 2.0)]);
        assert_eq!(results.iter().next().unwrap().label, "c");
    }

    #[test]
    fn test_lookup() {
        let mut results = ResultSet::new();
        assert!(results.is_empty());

        results.insert(measurement("a", 5.0, 1.0));
        assert!(results.contains_key(5.0));
        assert!(!results.contains_key(2.0));
        assert_eq!(results.get(5.0), Some(1.0));
    }

    #[test]
    fn test_serializes_as_list() {
        let mut results = ResultSet::new();
        results.insert(measurement("a", 5.0, 1.0));

        let json = serde_json::to_value(&results).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["independent"], 5.0);
        assert_eq!(json[0]["seconds"], 1.0);
    }
}

//! Metric sets and per-state threshold tables.
//!
//! A threshold table holds one requirement map per state. A metric set
//! conforms to a state when every requirement for that state is met:
//! - each required indicator must be present in the metric set
//! - its value must be `>=` the required minimum
//!
//! Tables must be monotonically non-decreasing along the sequence: every
//! indicator required by a state is also required by every later state, at
//! an equal or higher minimum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{LadderError, Result};

/// Well-known indicator names.
pub mod keys {
    /// Scalar efficiency used by the advancement rule.
    pub const EFFICIENCY: &str = "efficiency";
    /// Mental load capacity, bounded to [0.0, 1.0].
    pub const MENTAL_LOAD: &str = "mental_load_capacity";
    /// Adaptation rate, bounded to [0.0, 1.0].
    pub const ADAPTATION_RATE: &str = "adaptation_rate";
    /// Number of tracked items (non-negative count).
    pub const TRACKED_ITEMS: &str = "tracked_items";
    /// Number of recorded accomplishments (non-negative count).
    pub const ACCOMPLISHMENTS: &str = "accomplishments";
}

/// A named collection of scalar indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<String, f64>,
}

impl MetricSet {
    /// Create an empty metric set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an indicator.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Read an indicator.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Number of indicators.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the set holds no indicators.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over indicators in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MetricSet {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One unmet requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Indicator name.
    pub indicator: String,
    /// Required minimum.
    pub required: f64,
    /// Observed value, `None` when the metric set lacks the indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
}

/// Per-state minimum requirements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    rows: Vec<BTreeMap<String, f64>>,
}

impl ThresholdTable {
    /// Build a table from one requirement map per state, in sequence order.
    ///
    /// Fails on non-finite minimums or on a table that is not monotonically
    /// non-decreasing.
    pub fn new(rows: Vec<BTreeMap<String, f64>>) -> Result<Self> {
        let table = Self { rows };
        table.check()?;
        Ok(table)
    }

    /// Build a table from static rows. Only for tables known to be valid.
    pub(crate) fn from_static(rows: &[&[(&str, f64)]]) -> Self {
        let table = Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|(k, v)| (k.to_string(), *v)).collect())
                .collect(),
        };
        debug_assert!(table.check().is_ok(), "built-in threshold table is invalid");
        table
    }

    /// Number of rows (one per state).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Requirements for the state at `index`.
    pub fn requirements(&self, index: usize) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(index)
    }

    /// Check whether `metrics` meets every requirement of the state at `index`.
    ///
    /// Returns false for an index outside the table.
    pub fn is_met(&self, index: usize, metrics: &MetricSet) -> bool {
        match self.rows.get(index) {
            Some(row) => row
                .iter()
                .all(|(key, min)| metrics.get(key).is_some_and(|v| v >= *min)),
            None => false,
        }
    }

    /// List the requirements of the state at `index` that `metrics` misses.
    pub fn shortfalls(&self, index: usize, metrics: &MetricSet) -> Vec<Shortfall> {
        let Some(row) = self.rows.get(index) else {
            return Vec::new();
        };

        row.iter()
            .filter_map(|(key, min)| {
                let actual = metrics.get(key);
                match actual {
                    Some(v) if v >= *min => None,
                    _ => Some(Shortfall {
                        indicator: key.clone(),
                        required: *min,
                        actual,
                    }),
                }
            })
            .collect()
    }

    fn check(&self) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            for (key, min) in row {
                if !min.is_finite() {
                    return Err(LadderError::invalid_thresholds(format!(
                        "row {} has a non-finite minimum for '{}'",
                        i, key
                    )));
                }
            }
        }

        for (i, pair) in self.rows.windows(2).enumerate() {
            let (earlier, later) = (&pair[0], &pair[1]);
            for (key, min) in earlier {
                match later.get(key) {
                    None => {
                        return Err(LadderError::invalid_thresholds(format!(
                            "row {} drops requirement '{}' required by row {}",
                            i + 1,
                            key,
                            i
                        )));
                    }
                    Some(next) if next < min => {
                        return Err(LadderError::invalid_thresholds(format!(
                            "row {} lowers '{}' from {} to {}",
                            i + 1,
                            key,
                            min,
                            next
                        )));
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn learning_table() -> ThresholdTable {
        ThresholdTable::new(vec![
            row(&[(keys::EFFICIENCY, 0.3), (keys::MENTAL_LOAD, 0.2)]),
            row(&[(keys::EFFICIENCY, 0.6), (keys::MENTAL_LOAD, 0.5)]),
            row(&[(keys::EFFICIENCY, 0.8), (keys::MENTAL_LOAD, 0.7)]),
            row(&[(keys::EFFICIENCY, 0.9), (keys::MENTAL_LOAD, 0.9)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_is_met_requires_every_entry() {
        let table = learning_table();
        let both = MetricSet::new()
            .with(keys::EFFICIENCY, 0.4)
            .with(keys::MENTAL_LOAD, 0.3);
        assert!(table.is_met(0, &both));

        let load_short = MetricSet::new()
            .with(keys::EFFICIENCY, 0.95)
            .with(keys::MENTAL_LOAD, 0.1);
        assert!(!table.is_met(0, &load_short));
    }

    #[test]
    fn test_is_met_boundary_is_inclusive() {
        let table = learning_table();
        let exact = MetricSet::new()
            .with(keys::EFFICIENCY, 0.6)
            .with(keys::MENTAL_LOAD, 0.5);
        assert!(table.is_met(1, &exact));
    }

    #[test]
    fn test_missing_indicator_fails() {
        let table = learning_table();
        let partial = MetricSet::new().with(keys::EFFICIENCY, 1.0);
        assert!(!table.is_met(0, &partial));
    }

    #[test]
    fn test_out_of_bounds_index_is_not_met() {
        let table = learning_table();
        let metrics = MetricSet::new().with(keys::EFFICIENCY, 1.0);
        assert!(!table.is_met(10, &metrics));
        assert!(table.shortfalls(10, &metrics).is_empty());
    }

    #[test]
    fn test_empty_row_always_met() {
        let table = ThresholdTable::new(vec![BTreeMap::new(), row(&[(keys::EFFICIENCY, 0.5)])])
            .unwrap();
        assert!(table.is_met(0, &MetricSet::new()));
    }

    #[test]
    fn test_shortfalls_lists_unmet_entries() {
        let table = learning_table();
        let metrics = MetricSet::new().with(keys::EFFICIENCY, 0.85);

        let gaps = table.shortfalls(2, &metrics);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].indicator, keys::MENTAL_LOAD);
        assert!((gaps[0].required - 0.7).abs() < f64::EPSILON);
        assert_eq!(gaps[0].actual, None);
    }

    #[test]
    fn test_rejects_decreasing_thresholds() {
        let result = ThresholdTable::new(vec![
            row(&[(keys::EFFICIENCY, 0.6)]),
            row(&[(keys::EFFICIENCY, 0.5)]),
        ]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("lowers 'efficiency'"));
    }

    #[test]
    fn test_rejects_dropped_requirement() {
        let result = ThresholdTable::new(vec![
            row(&[(keys::EFFICIENCY, 0.3), (keys::MENTAL_LOAD, 0.2)]),
            row(&[(keys::EFFICIENCY, 0.6)]),
        ]);
        assert!(matches!(result, Err(LadderError::InvalidThresholds { .. })));
    }

    #[test]
    fn test_rejects_non_finite_minimum() {
        let result = ThresholdTable::new(vec![row(&[(keys::EFFICIENCY, f64::NAN)])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_later_rows_may_add_requirements() {
        let result = ThresholdTable::new(vec![
            row(&[(keys::EFFICIENCY, 0.3)]),
            row(&[(keys::EFFICIENCY, 0.3), (keys::ADAPTATION_RATE, 0.4)]),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_metric_set_from_iter_and_serde() {
        let metrics: MetricSet = [(keys::EFFICIENCY, 0.5), (keys::TRACKED_ITEMS, 2.0)]
            .into_iter()
            .collect();
        assert_eq!(metrics.len(), 2);
        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"efficiency":0.5,"tracked_items":2.0}"#);
    }
}

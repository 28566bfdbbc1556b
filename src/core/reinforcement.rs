//! Reinforcement settings.
//!
//! After a successful validation the engine nudges stored indicators upward
//! by fixed increments. Increments saturate at a ceiling so bounded
//! indicators stay inside [0.0, 1.0].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::thresholds::keys;
use crate::error::{ensure_unit, LadderError, Result};

/// Default increment for the efficiency indicator.
pub const DEFAULT_EFFICIENCY_INCREMENT: f64 = 0.1;

/// Default increment for the mental load capacity indicator.
pub const DEFAULT_LOAD_INCREMENT: f64 = 0.05;

/// Default saturation ceiling.
pub const DEFAULT_CEILING: f64 = 1.0;

/// Increments applied by `optimize`, keyed by indicator name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Reinforcement {
    /// Upper bound no increment may cross, in [0.0, 1.0].
    pub ceiling: f64,
    /// Non-negative increment per indicator.
    pub increments: BTreeMap<String, f64>,
}

impl Default for Reinforcement {
    fn default() -> Self {
        let increments = [
            (keys::EFFICIENCY.to_string(), DEFAULT_EFFICIENCY_INCREMENT),
            (keys::MENTAL_LOAD.to_string(), DEFAULT_LOAD_INCREMENT),
        ]
        .into_iter()
        .collect();

        Self {
            ceiling: DEFAULT_CEILING,
            increments,
        }
    }
}

impl Reinforcement {
    /// Reinforcement that changes nothing.
    pub fn none() -> Self {
        Self {
            ceiling: DEFAULT_CEILING,
            increments: BTreeMap::new(),
        }
    }

    /// Builder-style increment.
    pub fn with_increment(mut self, indicator: impl Into<String>, delta: f64) -> Self {
        self.increments.insert(indicator.into(), delta);
        self
    }

    /// Check the ceiling and every increment against their domains.
    pub fn validate(&self) -> Result<()> {
        ensure_unit("reinforcement.ceiling", self.ceiling)?;
        for (indicator, delta) in &self.increments {
            if !(delta.is_finite() && *delta >= 0.0) {
                return Err(LadderError::out_of_range(
                    format!("reinforcement.increments.{}", indicator),
                    *delta,
                    "expected a finite value >= 0.0",
                ));
            }
        }
        Ok(())
    }
}

/// One indicator change made by `optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Indicator name.
    pub indicator: String,
    /// Value before the increment.
    pub before: f64,
    /// Value after the saturating increment.
    pub after: f64,
}

/// Result of an `optimize` call.
///
/// A failed validation is a no-op, reported through `validated = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementOutcome {
    /// Whether the current state validated against the live metrics.
    pub validated: bool,
    /// Indicators that accepted an increment.
    pub adjustments: Vec<Adjustment>,
}

impl ReinforcementOutcome {
    /// Outcome for a failed validation.
    pub fn skipped() -> Self {
        Self {
            validated: false,
            adjustments: Vec::new(),
        }
    }

    /// Check whether any indicator actually moved.
    pub fn changed(&self) -> bool {
        self.adjustments.iter().any(|a| a.after != a.before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_increments() {
        let r = Reinforcement::default();
        assert_eq!(r.ceiling, 1.0);
        assert_eq!(r.increments.get(keys::EFFICIENCY), Some(&0.1));
        assert_eq!(r.increments.get(keys::MENTAL_LOAD), Some(&0.05));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_none_is_empty() {
        assert!(Reinforcement::none().increments.is_empty());
    }

    #[test]
    fn test_validate_rejects_negative_increment() {
        let r = Reinforcement::none().with_increment(keys::EFFICIENCY, -0.1);
        let err = r.validate().unwrap_err();
        assert!(err.to_string().contains("reinforcement.increments.efficiency"));
    }

    #[test]
    fn test_validate_rejects_bad_ceiling() {
        let r = Reinforcement {
            ceiling: 1.5,
            ..Default::default()
        };
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_outcome_changed() {
        assert!(!ReinforcementOutcome::skipped().changed());
        let saturated = ReinforcementOutcome {
            validated: true,
            adjustments: vec![Adjustment {
                indicator: keys::EFFICIENCY.to_string(),
                before: 1.0,
                after: 1.0,
            }],
        };
        assert!(!saturated.changed());
    }

    #[test]
    fn test_toml_section() {
        let r: Reinforcement = toml::from_str(
            r#"
ceiling = 0.9
[increments]
adaptation_rate = 0.02
"#,
        )
        .unwrap();
        assert_eq!(r.ceiling, 0.9);
        assert_eq!(r.increments.len(), 1);
        assert_eq!(r.increments.get(keys::ADAPTATION_RATE), Some(&0.02));
    }
}

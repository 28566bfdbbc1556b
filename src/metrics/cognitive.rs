//! Cognitive profile metric source.
//!
//! Three stored indicators bounded to [0.0, 1.0]. Unlike the skill
//! portfolio, efficiency here is a stored value, so reinforcement can move it.

use std::collections::BTreeMap;

use crate::core::thresholds::keys;
use crate::core::MetricSet;
use crate::error::{ensure_unit, Result};
use crate::metrics::scoring::DepthRule;
use crate::metrics::traits::{saturating_add, Depth, MetricSource};

/// Learning efficiency, mental load capacity and adaptation rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CognitiveProfile {
    learning_efficiency: f64,
    mental_load_capacity: f64,
    adaptation_rate: f64,
    depth: DepthRule,
}

impl CognitiveProfile {
    /// Create a profile. Every indicator must be finite and in [0.0, 1.0].
    pub fn new(
        learning_efficiency: f64,
        mental_load_capacity: f64,
        adaptation_rate: f64,
    ) -> Result<Self> {
        Ok(Self {
            learning_efficiency: ensure_unit(keys::EFFICIENCY, learning_efficiency)?,
            mental_load_capacity: ensure_unit(keys::MENTAL_LOAD, mental_load_capacity)?,
            adaptation_rate: ensure_unit(keys::ADAPTATION_RATE, adaptation_rate)?,
            depth: DepthRule::default(),
        })
    }

    /// Replace the depth rule.
    pub fn with_depth_rule(mut self, depth: DepthRule) -> Result<Self> {
        depth.validate()?;
        self.depth = depth;
        Ok(self)
    }

    /// Stored learning efficiency.
    pub fn learning_efficiency(&self) -> f64 {
        self.learning_efficiency
    }

    /// Stored mental load capacity.
    pub fn mental_load_capacity(&self) -> f64 {
        self.mental_load_capacity
    }

    /// Stored adaptation rate.
    pub fn adaptation_rate(&self) -> f64 {
        self.adaptation_rate
    }
}

impl MetricSource for CognitiveProfile {
    type Depth = Depth;

    fn compute_efficiency(&self) -> f64 {
        self.learning_efficiency
    }

    fn assess_depth(&self) -> Depth {
        if self.mental_load_capacity >= self.depth.load_cutoff {
            Depth::Advanced
        } else {
            Depth::Intermediate
        }
    }

    fn map_transferability(&self) -> BTreeMap<String, f64> {
        BTreeMap::new()
    }

    fn metric_set(&self) -> MetricSet {
        MetricSet::new()
            .with(keys::EFFICIENCY, self.learning_efficiency)
            .with(keys::MENTAL_LOAD, self.mental_load_capacity)
            .with(keys::ADAPTATION_RATE, self.adaptation_rate)
    }

    fn reinforce(&mut self, indicator: &str, delta: f64, ceiling: f64) -> Option<f64> {
        let slot = match indicator {
            keys::EFFICIENCY => &mut self.learning_efficiency,
            keys::MENTAL_LOAD => &mut self.mental_load_capacity,
            keys::ADAPTATION_RATE => &mut self.adaptation_rate,
            _ => return None,
        };
        *slot = saturating_add(*slot, delta, ceiling);
        Some(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LadderError;
    use crate::metrics::traits::tests::check_metric_source_contract;

    #[test]
    fn test_contract() {
        check_metric_source_contract(&CognitiveProfile::new(0.4, 0.3, 0.2).unwrap());
        check_metric_source_contract(&CognitiveProfile::new(1.0, 1.0, 1.0).unwrap());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = CognitiveProfile::new(0.4, 1.3, 0.2).unwrap_err();
        assert!(matches!(err, LadderError::OutOfRange { .. }));
        assert!(err.to_string().contains(keys::MENTAL_LOAD));

        assert!(CognitiveProfile::new(-0.1, 0.3, 0.2).is_err());
        assert!(CognitiveProfile::new(0.4, 0.3, f64::NAN).is_err());
    }

    #[test]
    fn test_metric_set_keys() {
        let profile = CognitiveProfile::new(0.4, 0.3, 0.2).unwrap();
        let metrics = profile.metric_set();
        assert_eq!(metrics.get(keys::EFFICIENCY), Some(0.4));
        assert_eq!(metrics.get(keys::MENTAL_LOAD), Some(0.3));
        assert_eq!(metrics.get(keys::ADAPTATION_RATE), Some(0.2));
        assert_eq!(metrics.len(), 3);
    }

    #[test]
    fn test_reinforce_known_indicators() {
        let mut profile = CognitiveProfile::new(0.4, 0.3, 0.2).unwrap();
        let next = profile.reinforce(keys::EFFICIENCY, 0.1, 1.0).unwrap();
        assert!((next - 0.5).abs() < 1e-12);
        assert!((profile.learning_efficiency() - 0.5).abs() < 1e-12);

        let next = profile.reinforce(keys::MENTAL_LOAD, 0.05, 1.0).unwrap();
        assert!((next - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_reinforce_unknown_indicator() {
        let mut profile = CognitiveProfile::new(0.4, 0.3, 0.2).unwrap();
        assert_eq!(profile.reinforce(keys::TRACKED_ITEMS, 1.0, 1.0), None);
        assert_eq!(profile, CognitiveProfile::new(0.4, 0.3, 0.2).unwrap());
    }

    #[test]
    fn test_reinforce_saturates() {
        let mut profile = CognitiveProfile::new(0.95, 0.3, 0.2).unwrap();
        assert_eq!(profile.reinforce(keys::EFFICIENCY, 0.1, 1.0), Some(1.0));
        assert_eq!(profile.reinforce(keys::EFFICIENCY, 0.1, 1.0), Some(1.0));
    }

    #[test]
    fn test_assess_depth() {
        let shallow = CognitiveProfile::new(0.4, 0.69, 0.2).unwrap();
        assert_eq!(shallow.assess_depth(), Depth::Intermediate);
        let deep = CognitiveProfile::new(0.4, 0.7, 0.2).unwrap();
        assert_eq!(deep.assess_depth(), Depth::Advanced);
    }

    #[test]
    fn test_with_depth_rule() {
        let rule = DepthRule {
            load_cutoff: 0.2,
            ..Default::default()
        };
        let profile = CognitiveProfile::new(0.4, 0.3, 0.2)
            .unwrap()
            .with_depth_rule(rule)
            .unwrap();
        assert_eq!(profile.assess_depth(), Depth::Advanced);

        let bad = DepthRule {
            load_cutoff: 2.0,
            ..Default::default()
        };
        assert!(CognitiveProfile::new(0.4, 0.3, 0.2)
            .unwrap()
            .with_depth_rule(bad)
            .is_err());
    }

    #[test]
    fn test_transferability_is_empty() {
        let profile = CognitiveProfile::new(0.4, 0.3, 0.2).unwrap();
        assert!(profile.map_transferability().is_empty());
    }
}

//! Metric source capability contract.
//!
//! This module defines the `MetricSource` trait: the only view the
//! progression engine has of the indicators it gates on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::MetricSet;

/// Coarse depth label derived from a fixed cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Depth {
    /// Below the depth cutoff.
    #[default]
    Intermediate,
    /// Past the depth cutoff.
    Advanced,
}

impl Depth {
    /// Display name of the depth label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Intermediate => "INTERMEDIATE",
            Depth::Advanced => "ADVANCED",
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holder of raw indicators and deriver of a scalar efficiency.
///
/// Every method is total: none of them fail for any reachable source state.
/// Invalid inputs are rejected when the concrete source is constructed.
pub trait MetricSource {
    /// Categorical depth assessment produced by this source.
    type Depth: Clone + fmt::Debug + Serialize;

    /// Derive efficiency in [0.0, 1.0] from the current indicators.
    ///
    /// Must be deterministic and monotonically non-decreasing in the
    /// source's growth indicators.
    fn compute_efficiency(&self) -> f64;

    /// Coarse depth label.
    fn assess_depth(&self) -> Self::Depth;

    /// Transferability score per tracked item.
    fn map_transferability(&self) -> BTreeMap<String, f64>;

    /// Snapshot of every indicator, including a freshly computed efficiency.
    fn metric_set(&self) -> MetricSet;

    /// Counter bumped on every effective mutation.
    ///
    /// Sources whose indicators can change without the metric set changing
    /// (counts past f64 precision) must override this. The default is 0,
    /// leaving the metric set as the only change signal.
    fn revision(&self) -> u64 {
        0
    }

    /// Apply a saturating increment to a stored indicator.
    ///
    /// Returns the new value, or `None` if the indicator is derived or
    /// unknown to this source. The result never exceeds `ceiling` unless the
    /// indicator was already above it, in which case it is left unchanged.
    fn reinforce(&mut self, _indicator: &str, _delta: f64, _ceiling: f64) -> Option<f64> {
        None
    }
}

/// Blanket implementation of MetricSource for boxed sources.
///
/// This allows an engine to own a `Box<dyn MetricSource<Depth = D>>` picked
/// at runtime.
impl<T: MetricSource + ?Sized> MetricSource for Box<T> {
    type Depth = T::Depth;

    fn compute_efficiency(&self) -> f64 {
        (**self).compute_efficiency()
    }

    fn assess_depth(&self) -> Self::Depth {
        (**self).assess_depth()
    }

    fn map_transferability(&self) -> BTreeMap<String, f64> {
        (**self).map_transferability()
    }

    fn metric_set(&self) -> MetricSet {
        (**self).metric_set()
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }

    fn reinforce(&mut self, indicator: &str, delta: f64, ceiling: f64) -> Option<f64> {
        (**self).reinforce(indicator, delta, ceiling)
    }
}

/// Saturating increment shared by sources with stored indicators.
pub(crate) fn saturating_add(value: f64, delta: f64, ceiling: f64) -> f64 {
    if value >= ceiling {
        value
    } else {
        (value + delta).min(ceiling)
    }
}

//! Scoring rules shared by metric sources.
//!
//! Efficiency model (defaults):
//! - baseline: 0.3
//! - log term: 0.2 × ln(tracked items + 1)
//! - accomplishment term: min(accomplishments / 100, 0.5)
//!
//! Terms are summed and the total is capped at 1.0. Every weight is
//! non-negative, so the score never decreases as items or accomplishments
//! grow.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ensure_unit, LadderError, Result};

/// Default scoring constants.
pub mod weights {
    /// Efficiency baseline.
    pub const BASE: f64 = 0.3;
    /// Weight of the logarithmic tracked-item term.
    pub const LOG_WEIGHT: f64 = 0.2;
    /// Accomplishments needed for one full point of the linear term.
    pub const ACCOMPLISHMENT_DIVISOR: f64 = 100.0;
    /// Cap of the linear accomplishment term.
    pub const ACCOMPLISHMENT_CAP: f64 = 0.5;
    /// Accomplishments above which depth is ADVANCED.
    pub const ADVANCED_AFTER: u64 = 50;
    /// Mental load capacity at which depth is ADVANCED.
    pub const LOAD_CUTOFF: f64 = 0.7;
    /// Transferability score for names missing from the table.
    pub const TRANSFER_DEFAULT: f64 = 0.5;
}

/// Saturating efficiency model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EfficiencyModel {
    /// Constant baseline, in [0.0, 1.0].
    pub base: f64,
    /// Weight of `ln(items + 1)`, non-negative.
    pub log_weight: f64,
    /// Divisor of the accomplishment counter, positive.
    pub accomplishment_divisor: f64,
    /// Cap of the accomplishment term, in [0.0, 1.0].
    pub accomplishment_cap: f64,
}

impl Default for EfficiencyModel {
    fn default() -> Self {
        Self {
            base: weights::BASE,
            log_weight: weights::LOG_WEIGHT,
            accomplishment_divisor: weights::ACCOMPLISHMENT_DIVISOR,
            accomplishment_cap: weights::ACCOMPLISHMENT_CAP,
        }
    }
}

impl EfficiencyModel {
    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<()> {
        ensure_unit("efficiency.base", self.base)?;
        ensure_unit("efficiency.accomplishment_cap", self.accomplishment_cap)?;
        if !(self.log_weight.is_finite() && self.log_weight >= 0.0) {
            return Err(LadderError::out_of_range(
                "efficiency.log_weight",
                self.log_weight,
                "expected a finite value >= 0.0",
            ));
        }
        if !(self.accomplishment_divisor.is_finite() && self.accomplishment_divisor > 0.0) {
            return Err(LadderError::out_of_range(
                "efficiency.accomplishment_divisor",
                self.accomplishment_divisor,
                "expected a finite value > 0.0",
            ));
        }
        Ok(())
    }

    /// Score a source with `items` tracked items and `accomplishments`
    /// recorded accomplishments.
    pub fn score(&self, items: usize, accomplishments: u64) -> f64 {
        let log_term = self.log_weight * ((items as f64) + 1.0).ln();
        let linear_term =
            (accomplishments as f64 / self.accomplishment_divisor).min(self.accomplishment_cap);

        (self.base + log_term + linear_term).min(1.0)
    }
}

/// Cutoffs for the depth assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepthRule {
    /// Accomplishment count above which a portfolio is ADVANCED.
    pub advanced_after: u64,
    /// Mental load capacity at or above which a cognitive profile is ADVANCED.
    pub load_cutoff: f64,
}

impl Default for DepthRule {
    fn default() -> Self {
        Self {
            advanced_after: weights::ADVANCED_AFTER,
            load_cutoff: weights::LOAD_CUTOFF,
        }
    }
}

impl DepthRule {
    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<()> {
        ensure_unit("depth.load_cutoff", self.load_cutoff)?;
        Ok(())
    }
}

/// Lookup table of transferability scores with an explicit default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransferTable {
    /// Score for names missing from `scores`.
    pub default_score: f64,
    /// Known scores by exact name.
    pub scores: BTreeMap<String, f64>,
}

impl Default for TransferTable {
    fn default() -> Self {
        let scores = [
            ("Java", 0.8),
            ("JavaScript", 0.7),
            ("TypeScript", 0.9),
            ("Python", 0.6),
        ]
        .into_iter()
        .map(|(name, score)| (name.to_string(), score))
        .collect();

        Self {
            default_score: weights::TRANSFER_DEFAULT,
            scores,
        }
    }
}

impl TransferTable {
    /// Check every score against [0.0, 1.0].
    pub fn validate(&self) -> Result<()> {
        ensure_unit("transferability.default_score", self.default_score)?;
        for (name, score) in &self.scores {
            ensure_unit(&format!("transferability.scores.{}", name), *score)?;
        }
        Ok(())
    }

    /// Score for a name. Exact match; unknown names get the default.
    pub fn score(&self, name: &str) -> f64 {
        self.scores.get(name).copied().unwrap_or(self.default_score)
    }
}

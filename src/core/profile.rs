//! Progression profiles.
//!
//! A profile bundles everything that distinguishes one progression flavor
//! from another: the ordered states, the threshold table and the advancement
//! cutoff. Flavors are configuration values, not types.
//!
//! Built-in flavors:
//! - `cognitive`: INITIALIZATION → EXPLORATION → INTEGRATION → MASTERY
//! - `skill_level`: BEGINNER → INTERMEDIATE → ADVANCED → EXPERT
//! - `learning_state`: INITIALIZATION → ACTIVE_LEARNING → INTEGRATION → MASTERY
//!
//! The numbers below are tunable defaults, not domain truths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::state::StateSequence;
use crate::core::thresholds::{keys, ThresholdTable};
use crate::error::{ensure_unit, LadderError, Result};

/// Default advancement cutoff. Efficiency must strictly exceed it.
pub const DEFAULT_ADVANCEMENT_CUTOFF: f64 = 0.7;

/// Valid values for the flavor field.
pub const VALID_FLAVORS: &[&str] = &["cognitive", "skill_level", "learning_state"];

/// Built-in progression flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Adaptive cognitive progression gated on efficiency.
    #[default]
    Cognitive,
    /// Skill levels gated on efficiency.
    SkillLevel,
    /// Learning states gated on efficiency and mental load capacity.
    LearningState,
}

impl Flavor {
    /// Config name of the flavor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Cognitive => "cognitive",
            Flavor::SkillLevel => "skill_level",
            Flavor::LearningState => "learning_state",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cognitive" => Ok(Flavor::Cognitive),
            "skill_level" => Ok(Flavor::SkillLevel),
            "learning_state" => Ok(Flavor::LearningState),
            other => Err(LadderError::config(format!(
                "unknown flavor '{}', valid values: {:?}",
                other, VALID_FLAVORS
            ))),
        }
    }
}

/// State sequence, threshold table and advancement cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionProfile {
    states: StateSequence,
    thresholds: ThresholdTable,
    cutoff: f64,
}

impl ProgressionProfile {
    /// Build a custom profile.
    ///
    /// Fails if the states are invalid, the table has a row count different
    /// from the state count, the table is not monotonic, or the cutoff is
    /// outside [0.0, 1.0].
    pub fn new<I, N>(states: I, thresholds: Vec<BTreeMap<String, f64>>, cutoff: f64) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let states = StateSequence::new(states)?;
        if thresholds.len() != states.len() {
            return Err(LadderError::invalid_thresholds(format!(
                "{} threshold rows for {} states",
                thresholds.len(),
                states.len()
            )));
        }
        let thresholds = ThresholdTable::new(thresholds)?;
        let cutoff = ensure_unit("advancement_cutoff", cutoff)?;

        Ok(Self {
            states,
            thresholds,
            cutoff,
        })
    }

    /// Built-in profile for a flavor, with the default cutoff.
    pub fn for_flavor(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Cognitive => Self::cognitive(),
            Flavor::SkillLevel => Self::skill_level(),
            Flavor::LearningState => Self::learning_state(),
        }
    }

    /// INITIALIZATION → EXPLORATION → INTEGRATION → MASTERY.
    pub fn cognitive() -> Self {
        Self::builtin(
            &["INITIALIZATION", "EXPLORATION", "INTEGRATION", "MASTERY"],
            &[
                &[(keys::EFFICIENCY, 0.3)],
                &[(keys::EFFICIENCY, 0.6)],
                &[(keys::EFFICIENCY, 0.8)],
                &[(keys::EFFICIENCY, 0.9)],
            ],
        )
    }

    /// BEGINNER → INTERMEDIATE → ADVANCED → EXPERT.
    pub fn skill_level() -> Self {
        Self::builtin(
            &["BEGINNER", "INTERMEDIATE", "ADVANCED", "EXPERT"],
            &[
                &[(keys::EFFICIENCY, 0.3)],
                &[(keys::EFFICIENCY, 0.6)],
                &[(keys::EFFICIENCY, 0.8)],
                &[(keys::EFFICIENCY, 0.95)],
            ],
        )
    }

    /// INITIALIZATION → ACTIVE_LEARNING → INTEGRATION → MASTERY.
    pub fn learning_state() -> Self {
        Self::builtin(
            &["INITIALIZATION", "ACTIVE_LEARNING", "INTEGRATION", "MASTERY"],
            &[
                &[(keys::EFFICIENCY, 0.3), (keys::MENTAL_LOAD, 0.2)],
                &[(keys::EFFICIENCY, 0.6), (keys::MENTAL_LOAD, 0.5)],
                &[(keys::EFFICIENCY, 0.8), (keys::MENTAL_LOAD, 0.7)],
                &[(keys::EFFICIENCY, 0.9), (keys::MENTAL_LOAD, 0.9)],
            ],
        )
    }

    fn builtin(states: &[&str], rows: &[&[(&str, f64)]]) -> Self {
        debug_assert_eq!(states.len(), rows.len());
        Self {
            states: StateSequence::from_static(states),
            thresholds: ThresholdTable::from_static(rows),
            cutoff: DEFAULT_ADVANCEMENT_CUTOFF,
        }
    }

    /// Replace the advancement cutoff.
    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self> {
        self.cutoff = ensure_unit("advancement_cutoff", cutoff)?;
        Ok(self)
    }

    /// The ordered states.
    pub fn states(&self) -> &StateSequence {
        &self.states
    }

    /// The threshold table.
    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// The advancement cutoff.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl Default for ProgressionProfile {
    fn default() -> Self {
        Self::cognitive()
    }
}

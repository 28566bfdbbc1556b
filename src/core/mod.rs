//! Core types and logic for Ladder.
//!
//! This module contains the state sequence, threshold tables, progression
//! profiles, reinforcement settings and the progression engine itself.

pub mod engine;
pub mod profile;
pub mod reinforcement;
pub mod state;
pub mod thresholds;

pub use engine::{EngineSnapshot, ProgressionEngine, TransitionOutcome, TransitionReason};
pub use profile::{Flavor, ProgressionProfile, DEFAULT_ADVANCEMENT_CUTOFF, VALID_FLAVORS};
pub use reinforcement::{Adjustment, Reinforcement, ReinforcementOutcome};
pub use state::{State, StateSequence};
pub use thresholds::{keys, MetricSet, Shortfall, ThresholdTable};

//! Ladder - Adaptive Threshold-Gated State Progression Engine
//!
//! Ladder moves an entity through an ordered sequence of named states. A
//! metric source derives a scalar efficiency from raw indicators; the engine
//! advances one state at a time once efficiency exceeds a cutoff, validates
//! metrics against per-state thresholds, and reinforces indicators after a
//! successful validation.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod metrics;

pub use config::Config;
pub use core::{
    EngineSnapshot, Flavor, MetricSet, ProgressionEngine, ProgressionProfile, Reinforcement,
    ReinforcementOutcome, State, StateSequence, ThresholdTable, TransitionOutcome,
    TransitionReason,
};
pub use error::{LadderError, Result};
pub use metrics::{CognitiveProfile, Depth, MetricSource, SkillPortfolio};

// CLI commands
pub use cli::{ProfileCommand, SimulateCommand, ValidateCommand};

//! Metric sources for Ladder.
//!
//! A metric source owns raw indicators and derives the scalar efficiency
//! that gates advancement. Two sources ship with the crate:
//! - [`SkillPortfolio`]: tracked items plus an accomplishment counter,
//!   efficiency derived from a saturating model
//! - [`CognitiveProfile`]: three stored indicators in [0.0, 1.0], all of
//!   them reinforceable

pub mod cognitive;
pub mod portfolio;
pub mod scoring;
pub mod traits;

pub use cognitive::CognitiveProfile;
pub use portfolio::SkillPortfolio;
pub use scoring::{weights, DepthRule, EfficiencyModel, TransferTable};
pub use traits::{Depth, MetricSource};

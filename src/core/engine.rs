//! Progression engine for Ladder.
//!
//! The engine owns one metric source and the current state of a progression
//! profile. It answers two different questions and keeps them apart:
//! - `validate`: do these metrics meet every threshold of a given state?
//! - `transition`: does efficiency exceed the cutoff, so the engine should
//!   move one step forward?
//!
//! Transitions never skip states and never move backward. A transition also
//! needs fresh evidence: once the engine advances on a metric set, it will
//! not advance again until the metric set or the source revision changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::profile::ProgressionProfile;
use crate::core::reinforcement::{Adjustment, Reinforcement, ReinforcementOutcome};
use crate::core::state::State;
use crate::core::thresholds::{MetricSet, Shortfall};
use crate::error::Result;
use crate::metrics::MetricSource;

/// Why a transition call ended where it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Moved one step forward.
    Advanced,
    /// Efficiency did not exceed the cutoff.
    BelowCutoff,
    /// Already at the terminal state.
    Terminal,
    /// Metrics unchanged since the last advancement.
    AwaitingProgress,
}

/// Result of a single transition call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// State before the call.
    pub from: State,
    /// State after the call.
    pub to: State,
    /// Efficiency read during the call.
    pub efficiency: f64,
    /// Cutoff the efficiency was compared against.
    pub cutoff: f64,
    /// Why the call ended in `to`.
    pub reason: TransitionReason,
}

impl TransitionOutcome {
    /// Check whether the call moved the engine.
    pub fn advanced(&self) -> bool {
        self.reason == TransitionReason::Advanced
    }
}

/// Read-only report of the engine and its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot<D> {
    /// Current state.
    pub state: State,
    /// Whether the current state is terminal.
    pub terminal: bool,
    /// Live efficiency.
    pub efficiency: f64,
    /// Advancement cutoff.
    pub cutoff: f64,
    /// Depth assessment of the source.
    pub depth: D,
    /// Live metric set.
    pub metrics: MetricSet,
    /// Whether the metrics meet every threshold of the current state.
    pub valid_for_current: bool,
    /// Unmet thresholds of the current state.
    pub shortfalls: Vec<Shortfall>,
    /// Transferability per tracked item.
    pub transferability: BTreeMap<String, f64>,
}

/// Threshold-gated state progression over a metric source.
///
/// All state mutations go through this struct.
#[derive(Debug, Clone)]
pub struct ProgressionEngine<S> {
    /// The metric source, owned exclusively.
    source: S,
    /// States, thresholds and cutoff.
    profile: ProgressionProfile,
    /// Increments applied by `optimize`.
    reinforcement: Reinforcement,
    /// Index of the current state; always valid for `profile`.
    current: usize,
    /// Revision and metric set that earned the last advancement.
    advanced_on: Option<(u64, MetricSet)>,
}

impl<S: MetricSource> ProgressionEngine<S> {
    /// Create an engine at the first state of the profile.
    pub fn new(source: S, profile: ProgressionProfile) -> Self {
        Self {
            source,
            profile,
            reinforcement: Reinforcement::default(),
            current: 0,
            advanced_on: None,
        }
    }

    /// Create an engine at a named state.
    ///
    /// Fails if the name is not a member of the profile's state sequence.
    pub fn with_initial_state(source: S, profile: ProgressionProfile, name: &str) -> Result<Self> {
        let state = profile.states().resolve(name)?;
        let mut engine = Self::new(source, profile);
        engine.current = state.index;
        Ok(engine)
    }

    /// Replace the reinforcement settings.
    pub fn with_reinforcement(mut self, reinforcement: Reinforcement) -> Result<Self> {
        reinforcement.validate()?;
        self.reinforcement = reinforcement;
        Ok(self)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Snapshot of the current state.
    pub fn current_state(&self) -> State {
        self.profile.states().state(self.current)
    }

    /// Check if the engine sits at the terminal state.
    pub fn is_terminal(&self) -> bool {
        self.profile.states().is_terminal(self.current)
    }

    /// The profile driving this engine.
    pub fn profile(&self) -> &ProgressionProfile {
        &self.profile
    }

    /// The reinforcement settings.
    pub fn reinforcement(&self) -> &Reinforcement {
        &self.reinforcement
    }

    /// The metric source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the metric source, for recording progress.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Give the metric source back, dropping the engine.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Live efficiency of the source.
    pub fn efficiency(&self) -> f64 {
        self.source.compute_efficiency()
    }

    /// Transferability per tracked item, straight from the source.
    pub fn analyze_transfer(&self) -> BTreeMap<String, f64> {
        self.source.map_transferability()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check whether `metrics` meets every threshold of `state`.
    ///
    /// Works for any state of the profile, not only the current one.
    /// States from a different sequence never validate.
    pub fn validate(&self, state: &State, metrics: &MetricSet) -> bool {
        self.profile.states().contains(state)
            && self.profile.thresholds().is_met(state.index, metrics)
    }

    /// Validate the live metrics against the current state.
    pub fn validate_current(&self) -> bool {
        self.validate(&self.current_state(), &self.source.metric_set())
    }

    /// Validate the live metrics against a named state.
    pub fn validate_at(&self, name: &str) -> Result<bool> {
        let state = self.profile.states().resolve(name)?;
        Ok(self.validate(&state, &self.source.metric_set()))
    }

    /// Unmet thresholds of `state` under the live metrics.
    pub fn shortfalls(&self, state: &State) -> Vec<Shortfall> {
        if !self.profile.states().contains(state) {
            return Vec::new();
        }
        self.profile
            .thresholds()
            .shortfalls(state.index, &self.source.metric_set())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Attempt a one-step advancement and report what happened.
    pub fn step(&mut self) -> TransitionOutcome {
        let from = self.current_state();
        let efficiency = self.source.compute_efficiency();
        let cutoff = self.profile.cutoff();

        let reason = if self.is_terminal() {
            TransitionReason::Terminal
        } else if efficiency <= cutoff {
            TransitionReason::BelowCutoff
        } else {
            let evidence = (self.source.revision(), self.source.metric_set());
            if self.advanced_on.as_ref() == Some(&evidence) {
                TransitionReason::AwaitingProgress
            } else {
                self.current += 1;
                self.advanced_on = Some(evidence);
                TransitionReason::Advanced
            }
        };

        let to = self.current_state();
        tracing::debug!(
            from = %from,
            to = %to,
            efficiency,
            cutoff,
            reason = ?reason,
            "transition"
        );

        TransitionOutcome {
            from,
            to,
            efficiency,
            cutoff,
            reason,
        }
    }

    /// Attempt a one-step advancement and return the resulting state.
    ///
    /// Returns the unchanged state when efficiency does not exceed the
    /// cutoff, when the engine is terminal, or when nothing changed since
    /// the last advancement.
    pub fn transition(&mut self) -> State {
        self.step().to
    }

    /// Reinforce the source when the current state validates.
    ///
    /// Each configured increment saturates at the ceiling. Indicators the
    /// source cannot reinforce are skipped. A failed validation is a no-op.
    pub fn optimize(&mut self) -> ReinforcementOutcome {
        let metrics = self.source.metric_set();
        let current = self.current_state();

        if !self.validate(&current, &metrics) {
            tracing::debug!(state = %current, "reinforcement skipped: validation failed");
            return ReinforcementOutcome::skipped();
        }

        let ceiling = self.reinforcement.ceiling;
        let mut adjustments = Vec::new();

        for (indicator, delta) in &self.reinforcement.increments {
            let Some(before) = metrics.get(indicator) else {
                continue;
            };
            if let Some(after) = self.source.reinforce(indicator, *delta, ceiling) {
                adjustments.push(Adjustment {
                    indicator: indicator.clone(),
                    before,
                    after,
                });
            }
        }

        tracing::debug!(
            state = %current,
            adjusted = adjustments.len(),
            "reinforcement applied"
        );

        ReinforcementOutcome {
            validated: true,
            adjustments,
        }
    }

    /// Return to the first state.
    ///
    /// Only ever caller-triggered; the engine never regresses on its own.
    pub fn reset(&mut self) {
        tracing::debug!(from = %self.current_state(), "reset");
        self.current = 0;
        self.advanced_on = None;
    }

    /// Structured report of the engine and its source.
    pub fn snapshot(&self) -> EngineSnapshot<S::Depth> {
        let state = self.current_state();
        let metrics = self.source.metric_set();
        let valid_for_current = self.validate(&state, &metrics);
        let shortfalls = self.profile.thresholds().shortfalls(state.index, &metrics);

        EngineSnapshot {
            terminal: self.is_terminal(),
            efficiency: self.source.compute_efficiency(),
            cutoff: self.profile.cutoff(),
            depth: self.source.assess_depth(),
            metrics,
            valid_for_current,
            shortfalls,
            transferability: self.source.map_transferability(),
            state,
        }
    }
}

//! Skill portfolio metric source.
//!
//! Tracks a set of named items (e.g. programming languages) and an
//! accomplishment counter (e.g. problems solved). Efficiency is derived on
//! every call and never cached.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;
use crate::core::thresholds::keys;
use crate::core::MetricSet;
use crate::error::{LadderError, Result};
use crate::metrics::scoring::{DepthRule, EfficiencyModel, TransferTable};
use crate::metrics::traits::{Depth, MetricSource};

/// Tracked items plus an accomplishment counter.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillPortfolio {
    items: BTreeSet<String>,
    accomplishments: u64,
    model: EfficiencyModel,
    transfer: TransferTable,
    depth: DepthRule,
    revision: u64,
}

impl SkillPortfolio {
    /// Create a portfolio with default scoring rules.
    ///
    /// Duplicate names collapse into one entry. Fails on blank names.
    pub fn new<I, N>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rules(
            items,
            0,
            EfficiencyModel::default(),
            TransferTable::default(),
            DepthRule::default(),
        )
    }

    /// Create a portfolio with scoring rules taken from configuration.
    pub fn from_config<I, N>(items: I, accomplishments: u64, config: &Config) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self::with_rules(
            items,
            accomplishments,
            config.efficiency.clone(),
            config.transferability.clone(),
            config.depth.clone(),
        )
    }

    /// Create a portfolio with explicit scoring rules.
    ///
    /// Every rule is validated; out-of-domain parameters are rejected rather
    /// than clamped.
    pub fn with_rules<I, N>(
        items: I,
        accomplishments: u64,
        model: EfficiencyModel,
        transfer: TransferTable,
        depth: DepthRule,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        model.validate()?;
        transfer.validate()?;
        depth.validate()?;

        let mut set = BTreeSet::new();
        for item in items {
            let item = item.into();
            if item.trim().is_empty() {
                return Err(LadderError::invalid_metric(
                    "tracked item name must not be blank",
                ));
            }
            set.insert(item);
        }

        Ok(Self {
            items: set,
            accomplishments,
            model,
            transfer,
            depth,
            revision: 0,
        })
    }

    /// Record one accomplishment. Saturates at `u64::MAX`.
    pub fn record_accomplishment(&mut self) {
        self.record_accomplishments(1);
    }

    /// Record several accomplishments at once.
    pub fn record_accomplishments(&mut self, count: u64) {
        let next = self.accomplishments.saturating_add(count);
        if next != self.accomplishments {
            self.accomplishments = next;
            self.revision = self.revision.wrapping_add(1);
        }
    }

    /// Start tracking an item.
    ///
    /// Returns false when the name is already tracked or blank; both are
    /// no-ops.
    pub fn add_tracked_item(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.trim().is_empty() {
            return false;
        }
        let inserted = self.items.insert(name);
        if inserted {
            self.revision = self.revision.wrapping_add(1);
        }
        inserted
    }

    /// Check whether an item is tracked.
    pub fn tracks(&self, name: &str) -> bool {
        self.items.contains(name)
    }

    /// Tracked items in name order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Number of tracked items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Accomplishment counter.
    pub fn accomplishments(&self) -> u64 {
        self.accomplishments
    }
}

impl MetricSource for SkillPortfolio {
    type Depth = Depth;

    fn compute_efficiency(&self) -> f64 {
        self.model.score(self.items.len(), self.accomplishments)
    }

    fn assess_depth(&self) -> Depth {
        if self.accomplishments > self.depth.advanced_after {
            Depth::Advanced
        } else {
            Depth::Intermediate
        }
    }

    fn map_transferability(&self) -> BTreeMap<String, f64> {
        self.items
            .iter()
            .map(|item| (item.clone(), self.transfer.score(item)))
            .collect()
    }

    fn metric_set(&self) -> MetricSet {
        MetricSet::new()
            .with(keys::EFFICIENCY, self.compute_efficiency())
            .with(keys::TRACKED_ITEMS, self.items.len() as f64)
            .with(keys::ACCOMPLISHMENTS, self.accomplishments as f64)
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    // Efficiency is derived; nothing here is reinforceable.
}

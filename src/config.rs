//! Configuration loading for Ladder.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.ladder/config.toml`)
//! 3. User config (`~/.ladder/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The engine runs with the built-in cognitive
//! profile when no config exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Flavor, ProgressionProfile, Reinforcement, DEFAULT_ADVANCEMENT_CUTOFF};
use crate::error::{ensure_unit, FailOpen, LadderError, Result};
use crate::metrics::{DepthRule, EfficiencyModel, TransferTable};

/// Main configuration struct for Ladder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Engine profile selection.
    pub engine: EngineConfig,
    /// Increments applied after successful validation.
    pub reinforcement: Reinforcement,
    /// Efficiency model for skill portfolios.
    pub efficiency: EfficiencyModel,
    /// Depth assessment cutoffs.
    pub depth: DepthRule,
    /// Transferability lookup table.
    pub transferability: TransferTable,
}

/// Engine profile selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Built-in flavor, ignored when `custom` is set.
    pub flavor: Flavor,
    /// Efficiency must strictly exceed this value to advance.
    pub advancement_cutoff: f64,
    /// User-defined profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flavor: Flavor::default(),
            advancement_cutoff: DEFAULT_ADVANCEMENT_CUTOFF,
            custom: None,
        }
    }
}

/// User-defined progression profile.
///
/// ```toml
/// [engine.custom]
/// states = ["NOVICE", "PRACTITIONER", "MENTOR"]
/// thresholds = [{ efficiency = 0.2 }, { efficiency = 0.5 }, { efficiency = 0.9 }]
/// cutoff = 0.6
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomProfile {
    /// Ordered state names.
    pub states: Vec<String>,
    /// One requirement table per state.
    pub thresholds: Vec<BTreeMap<String, f64>>,
    /// Overrides `engine.advancement_cutoff` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.ladder/config.toml` in cwd)
    /// 3. User config (`~/.ladder/config.toml`)
    /// 4. Defaults
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.ladder/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = ladder_home()?;
        Self::load_layer(&home.join("config.toml"))
    }

    /// Load project config from `.ladder/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_layer(&project_ladder_dir(cwd).join("config.toml"))
    }

    /// Load one layer. Missing files are skipped; unreadable or malformed
    /// files are skipped with a warning.
    fn load_layer(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default(&format!("loading {}", path.display()))
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| LadderError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| LadderError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LADDER_FLAVOR
        if let Ok(val) = env::var("LADDER_FLAVOR") {
            match val.parse::<Flavor>() {
                Ok(flavor) => self.engine.flavor = flavor,
                Err(_) => tracing::warn!(
                    "Invalid LADDER_FLAVOR value '{}'. Valid values: {:?}. Using '{}'.",
                    val,
                    crate::core::VALID_FLAVORS,
                    self.engine.flavor
                ),
            }
        }

        // LADDER_ADVANCEMENT_CUTOFF
        if let Some(n) = unit_from_env("LADDER_ADVANCEMENT_CUTOFF", self.engine.advancement_cutoff)
        {
            self.engine.advancement_cutoff = n;
        }

        // LADDER_REINFORCEMENT_CEILING
        if let Some(n) = unit_from_env("LADDER_REINFORCEMENT_CEILING", self.reinforcement.ceiling)
        {
            self.reinforcement.ceiling = n;
        }

        // LADDER_TRANSFER_DEFAULT
        if let Some(n) = unit_from_env("LADDER_TRANSFER_DEFAULT", self.transferability.default_score)
        {
            self.transferability.default_score = n;
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence, field by field. Only values that
    /// differ from the defaults are applied, so each layer needs to specify
    /// only its customizations.
    ///
    /// # Limitation
    ///
    /// A layer cannot set a value back to its default to undo a non-default
    /// value from a lower layer: the two cases are indistinguishable after
    /// parsing.
    fn merge(mut self, other: Config) -> Self {
        // Engine
        let default_engine = EngineConfig::default();
        if other.engine.flavor != default_engine.flavor {
            self.engine.flavor = other.engine.flavor;
        }
        if other.engine.advancement_cutoff != default_engine.advancement_cutoff {
            self.engine.advancement_cutoff = other.engine.advancement_cutoff;
        }
        if other.engine.custom.is_some() {
            self.engine.custom = other.engine.custom;
        }

        // Reinforcement: the increment table is taken whole when customized
        let default_reinforcement = Reinforcement::default();
        if other.reinforcement.ceiling != default_reinforcement.ceiling {
            self.reinforcement.ceiling = other.reinforcement.ceiling;
        }
        if other.reinforcement.increments != default_reinforcement.increments {
            self.reinforcement.increments = other.reinforcement.increments;
        }

        // Efficiency: field by field
        let default_model = EfficiencyModel::default();
        if other.efficiency.base != default_model.base {
            self.efficiency.base = other.efficiency.base;
        }
        if other.efficiency.log_weight != default_model.log_weight {
            self.efficiency.log_weight = other.efficiency.log_weight;
        }
        if other.efficiency.accomplishment_divisor != default_model.accomplishment_divisor {
            self.efficiency.accomplishment_divisor = other.efficiency.accomplishment_divisor;
        }
        if other.efficiency.accomplishment_cap != default_model.accomplishment_cap {
            self.efficiency.accomplishment_cap = other.efficiency.accomplishment_cap;
        }

        // Depth: field by field
        let default_depth = DepthRule::default();
        if other.depth.advanced_after != default_depth.advanced_after {
            self.depth.advanced_after = other.depth.advanced_after;
        }
        if other.depth.load_cutoff != default_depth.load_cutoff {
            self.depth.load_cutoff = other.depth.load_cutoff;
        }

        // Transferability: default score, then per-name scores additively
        let default_transfer = TransferTable::default();
        if other.transferability.default_score != default_transfer.default_score {
            self.transferability.default_score = other.transferability.default_score;
        }
        for (name, score) in other.transferability.scores {
            if default_transfer.scores.get(&name) != Some(&score) {
                self.transferability.scores.insert(name, score);
            }
        }

        self
    }

    /// Check every section against its domain.
    pub fn validate(&self) -> Result<()> {
        ensure_unit("engine.advancement_cutoff", self.engine.advancement_cutoff)?;
        self.reinforcement.validate()?;
        self.efficiency.validate()?;
        self.depth.validate()?;
        self.transferability.validate()?;
        Ok(())
    }

    /// Build the effective progression profile.
    ///
    /// A custom profile wins over the built-in flavor. Custom profiles are
    /// validated exactly like built-in ones.
    pub fn profile(&self) -> Result<ProgressionProfile> {
        match &self.engine.custom {
            Some(custom) => ProgressionProfile::new(
                custom.states.iter().cloned(),
                custom.thresholds.clone(),
                custom.cutoff.unwrap_or(self.engine.advancement_cutoff),
            ),
            None => ProgressionProfile::for_flavor(self.engine.flavor)
                .with_cutoff(self.engine.advancement_cutoff),
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LadderError::config(e.to_string()))
    }
}

/// Read a [0.0, 1.0] value from the environment.
///
/// Returns `None`, with a warning, when the variable is set but invalid.
fn unit_from_env(name: &str, current: f64) -> Option<f64> {
    let val = env::var(name).ok()?;
    match val.parse::<f64>() {
        Ok(n) if (0.0..=1.0).contains(&n) => Some(n),
        Ok(n) => {
            tracing::warn!(
                "Invalid {} value '{}'. Must be in range [0.0, 1.0]. Using '{}'.",
                name,
                n,
                current
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                "Invalid {} value '{}'. Expected a decimal number. Using '{}'.",
                name,
                val,
                current
            );
            None
        }
    }
}

/// Get the Ladder home directory.
///
/// Checks `LADDER_HOME` first, then falls back to `~/.ladder`. An empty
/// `LADDER_HOME` is ignored.
pub fn ladder_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("LADDER_HOME") {
        if home.is_empty() {
            tracing::warn!("LADDER_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".ladder"))
}

/// Get the project `.ladder` directory for a working directory.
pub fn project_ladder_dir(cwd: &Path) -> PathBuf {
    cwd.join(".ladder")
}

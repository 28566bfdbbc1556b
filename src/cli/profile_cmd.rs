//! Profile command for Ladder.
//!
//! Shows the effective progression profile and the configuration it was
//! built from.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;

/// Options for the profile command.
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One row of the effective profile.
#[derive(Debug, Clone, Serialize)]
pub struct StateRow {
    /// State name.
    pub name: String,
    /// Minimum value per indicator.
    pub requirements: BTreeMap<String, f64>,
}

/// Output format for the profile command.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Flavor name, or "custom".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Advancement cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
    /// States with their requirements, in order.
    pub states: Vec<StateRow>,
    /// Effective configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileOutput {
    /// Create a successful output.
    pub fn success(flavor: String, cutoff: f64, states: Vec<StateRow>, config: Config) -> Self {
        Self {
            success: true,
            flavor: Some(flavor),
            cutoff: Some(cutoff),
            states,
            config: Some(config),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            flavor: None,
            cutoff: None,
            states: Vec::new(),
            config: None,
            error: Some(error.into()),
        }
    }
}

/// The profile command implementation.
pub struct ProfileCommand {
    config: Config,
}

impl ProfileCommand {
    /// Create a new profile command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the profile command.
    pub fn run(&self, _options: &ProfileOptions) -> ProfileOutput {
        if let Err(e) = self.config.validate() {
            return ProfileOutput::failure(e.to_string());
        }
        let profile = match self.config.profile() {
            Ok(profile) => profile,
            Err(e) => return ProfileOutput::failure(e.to_string()),
        };

        let flavor = if self.config.engine.custom.is_some() {
            "custom".to_string()
        } else {
            self.config.engine.flavor.to_string()
        };

        let states = profile
            .states()
            .iter()
            .map(|state| StateRow {
                requirements: profile
                    .thresholds()
                    .requirements(state.index)
                    .cloned()
                    .unwrap_or_default(),
                name: state.name,
            })
            .collect();

        ProfileOutput::success(flavor, profile.cutoff(), states, self.config.clone())
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ProfileOutput, options: &ProfileOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &ProfileOutput) -> String {
        if !output.success {
            return format!(
                "Profile command failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "Flavor: {}",
            output.flavor.as_deref().unwrap_or("unknown")
        ));
        if let Some(cutoff) = output.cutoff {
            lines.push(format!("Advance when efficiency > {:.2}", cutoff));
        }
        lines.push(String::new());

        for (i, row) in output.states.iter().enumerate() {
            let requirements = if row.requirements.is_empty() {
                "(no requirements)".to_string()
            } else {
                row.requirements
                    .iter()
                    .map(|(k, v)| format!("{} >= {:.2}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            lines.push(format!("{}. {:<16} {}", i + 1, row.name, requirements));
        }

        if let Some(config) = &output.config {
            if let Ok(rendered) = config.to_toml() {
                lines.push(String::new());
                lines.push("Effective configuration:".to_string());
                lines.push(rendered.trim_end().to_string());
            }
        }

        lines.join("\n") + "\n"
    }
}

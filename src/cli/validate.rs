//! Validate command for Ladder.
//!
//! Builds a cognitive profile and reports, per state, whether it meets the
//! state's thresholds. Validation is independent of advancement, so any
//! state can be checked.

use serde::Serialize;

use crate::config::Config;
use crate::core::{ProgressionEngine, Shortfall};
use crate::error::Result;
use crate::metrics::{CognitiveProfile, Depth, MetricSource};

/// Options for the validate command.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Only check this state.
    pub state: Option<String>,
}

/// Verdict for one state.
#[derive(Debug, Clone, Serialize)]
pub struct StateVerdict {
    /// State name.
    pub state: String,
    /// Whether every threshold is met.
    pub valid: bool,
    /// Unmet thresholds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortfalls: Vec<Shortfall>,
}

/// Output format for the validate command.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Efficiency of the profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<f64>,
    /// Depth assessment of the profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Depth>,
    /// Per-state verdicts in sequence order.
    pub verdicts: Vec<StateVerdict>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateOutput {
    /// Create a successful output.
    pub fn success(efficiency: f64, depth: Depth, verdicts: Vec<StateVerdict>) -> Self {
        Self {
            success: true,
            efficiency: Some(efficiency),
            depth: Some(depth),
            verdicts,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            efficiency: None,
            depth: None,
            verdicts: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The validate command implementation.
pub struct ValidateCommand {
    efficiency: f64,
    load: f64,
    adaptation: f64,
    config: Config,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(efficiency: f64, load: f64, adaptation: f64, config: Config) -> Self {
        Self {
            efficiency,
            load,
            adaptation,
            config,
        }
    }

    /// Run the validate command.
    pub fn run(&self, options: &ValidateOptions) -> ValidateOutput {
        match self.validate(options) {
            Ok(output) => output,
            Err(e) => ValidateOutput::failure(e.to_string()),
        }
    }

    fn validate(&self, options: &ValidateOptions) -> Result<ValidateOutput> {
        let source = CognitiveProfile::new(self.efficiency, self.load, self.adaptation)?
            .with_depth_rule(self.config.depth.clone())?;
        let engine = ProgressionEngine::new(source, self.config.profile()?);

        let states = match &options.state {
            Some(name) => vec![engine.profile().states().resolve(name)?],
            None => engine.profile().states().iter().collect(),
        };

        let verdicts = states
            .iter()
            .map(|state| StateVerdict {
                state: state.name.clone(),
                valid: engine.validate(state, &engine.source().metric_set()),
                shortfalls: engine.shortfalls(state),
            })
            .collect();

        Ok(ValidateOutput::success(
            engine.efficiency(),
            engine.source().assess_depth(),
            verdicts,
        ))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ValidateOutput, options: &ValidateOptions) -> String {
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
    fn format_human_readable(&self, output: &ValidateOutput) -> String {
        if !output.success {
            return format!(
                "Validation failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if let Some(efficiency) = output.efficiency {
            lines.push(format!("Efficiency: {:.4}", efficiency));
        }
        if let Some(depth) = output.depth {
            lines.push(format!("Depth: {}", depth));
        }
        lines.push(String::new());

        for verdict in &output.verdicts {
            let mark = if verdict.valid { "ok  " } else { "FAIL" };
            lines.push(format!("[{}] {}", mark, verdict.state));
            for gap in &verdict.shortfalls {
                let actual = gap
                    .actual
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "missing".to_string());
                lines.push(format!(
                    "       {} needs >= {:.4}, has {}",
                    gap.indicator, gap.required, actual
                ));
            }
        }

        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{keys, Flavor};

    fn learning_state_config() -> Config {
        let mut config = Config::default();
        config.engine.flavor = Flavor::LearningState;
        config
    }

    #[test]
    fn test_validate_all_states() {
        let cmd = ValidateCommand::new(0.4, 0.3, 0.2, learning_state_config());

        let output = cmd.run(&ValidateOptions::default());

        assert!(output.success);
        assert_eq!(output.verdicts.len(), 4);
        assert!(output.verdicts[0].valid);
        assert!(!output.verdicts[1].valid);
        assert_eq!(output.verdicts[1].shortfalls.len(), 2);
        assert_eq!(output.depth, Some(Depth::Intermediate));
    }

    #[test]
    fn test_validate_single_state() {
        let cmd = ValidateCommand::new(0.85, 0.75, 0.2, learning_state_config());
        let options = ValidateOptions {
            state: Some("INTEGRATION".to_string()),
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert_eq!(output.verdicts.len(), 1);
        assert_eq!(output.verdicts[0].state, "INTEGRATION");
        assert!(output.verdicts[0].valid);
    }

    #[test]
    fn test_validate_unknown_state_fails() {
        let cmd = ValidateCommand::new(0.5, 0.5, 0.5, Config::default());
        let options = ValidateOptions {
            state: Some("BEGINNER".to_string()),
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(!output.success);
        assert!(output.error.unwrap().contains("unknown state"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_metric() {
        let cmd = ValidateCommand::new(1.2, 0.5, 0.5, Config::default());
        let output = cmd.run(&ValidateOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains(keys::EFFICIENCY));
    }

    #[test]
    fn test_format_output_json() {
        let cmd = ValidateCommand::new(0.65, 0.4, 0.2, learning_state_config());
        let options = ValidateOptions {
            json: true,
            state: Some("ACTIVE_LEARNING".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(parsed["verdicts"][0]["valid"], false);
        assert_eq!(
            parsed["verdicts"][0]["shortfalls"][0]["indicator"],
            keys::MENTAL_LOAD
        );
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = ValidateCommand::new(0.65, 0.4, 0.2, learning_state_config());
        let output = cmd.run(&ValidateOptions::default());

        let formatted = cmd.format_output(&output, &ValidateOptions::default());

        assert!(formatted.contains("[ok  ] INITIALIZATION"));
        assert!(formatted.contains("[FAIL] ACTIVE_LEARNING"));
        assert!(formatted.contains("mental_load_capacity needs >= 0.5000, has 0.4000"));
    }

    #[test]
    fn test_format_output_quiet() {
        let cmd = ValidateCommand::new(0.5, 0.5, 0.5, Config::default());
        let options = ValidateOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }
}

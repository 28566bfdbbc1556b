//! Simulate command for Ladder.
//!
//! Builds a skill portfolio, then repeatedly records accomplishments and
//! attempts a transition, optionally reinforcing after each step.

use serde::Serialize;

use crate::config::Config;
use crate::core::{EngineSnapshot, ProgressionEngine, ReinforcementOutcome, TransitionOutcome};
use crate::error::{LadderError, Result};
use crate::metrics::{Depth, SkillPortfolio};

/// Upper bound on `--steps`.
pub const MAX_STEPS: usize = 10_000;

/// Options for the simulate command.
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Number of transition attempts.
    pub steps: usize,
    /// Accomplishments recorded before each attempt.
    pub per_step: u64,
    /// Run reinforcement after each attempt.
    pub optimize: bool,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            json: false,
            quiet: false,
            steps: 5,
            per_step: 1,
            optimize: false,
        }
    }
}

/// One simulated step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// 1-based step number.
    pub step: usize,
    /// Accomplishment counter after recording this step's progress.
    pub accomplishments: u64,
    /// Transition result.
    pub transition: TransitionOutcome,
    /// Reinforcement result, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reinforcement: Option<ReinforcementOutcome>,
}

/// Output format for the simulate command.
#[derive(Debug, Clone, Serialize)]
pub struct SimulateOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Per-step reports.
    pub steps: Vec<StepReport>,
    /// Final engine snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<EngineSnapshot<Depth>>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulateOutput {
    /// Create a successful output.
    pub fn success(steps: Vec<StepReport>, snapshot: EngineSnapshot<Depth>) -> Self {
        Self {
            success: true,
            steps,
            snapshot: Some(snapshot),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            steps: Vec::new(),
            snapshot: None,
            error: Some(error.into()),
        }
    }
}

/// The simulate command implementation.
pub struct SimulateCommand {
    items: Vec<String>,
    accomplishments: u64,
    config: Config,
}

impl SimulateCommand {
    /// Create a new simulate command.
    pub fn new(items: Vec<String>, accomplishments: u64, config: Config) -> Self {
        Self {
            items,
            accomplishments,
            config,
        }
    }

    /// Run the simulate command.
    pub fn run(&self, options: &SimulateOptions) -> SimulateOutput {
        match self.simulate(options) {
            Ok(output) => output,
            Err(e) => SimulateOutput::failure(e.to_string()),
        }
    }

    fn simulate(&self, options: &SimulateOptions) -> Result<SimulateOutput> {
        if options.steps > MAX_STEPS {
            return Err(LadderError::config(format!(
                "steps must be at most {}, got {}",
                MAX_STEPS, options.steps
            )));
        }

        let portfolio = SkillPortfolio::from_config(
            self.items.iter().cloned(),
            self.accomplishments,
            &self.config,
        )?;
        let mut engine = ProgressionEngine::new(portfolio, self.config.profile()?)
            .with_reinforcement(self.config.reinforcement.clone())?;

        let mut steps = Vec::new();
        for step in 1..=options.steps {
            engine.source_mut().record_accomplishments(options.per_step);
            let transition = engine.step();
            let reinforcement = options.optimize.then(|| engine.optimize());

            steps.push(StepReport {
                step,
                accomplishments: engine.source().accomplishments(),
                transition,
                reinforcement,
            });
        }

        Ok(SimulateOutput::success(steps, engine.snapshot()))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SimulateOutput, options: &SimulateOptions) -> String {
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
    fn format_human_readable(&self, output: &SimulateOutput) -> String {
        if !output.success {
            return format!(
                "Simulation failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        for report in &output.steps {
            let t = &report.transition;
            let marker = if t.advanced() { "->" } else { "==" };
            lines.push(format!(
                "step {:>3}  done={:<5} efficiency={:.4}  {} {} {}",
                report.step, report.accomplishments, t.efficiency, t.from, marker, t.to
            ));
        }

        if let Some(snapshot) = &output.snapshot {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("Final state: {}", snapshot.state));
            lines.push(format!("Efficiency: {:.4}", snapshot.efficiency));
            lines.push(format!("Depth: {}", snapshot.depth));
            lines.push(format!(
                "Meets current thresholds: {}",
                if snapshot.valid_for_current { "yes" } else { "no" }
            ));
            if !snapshot.transferability.is_empty() {
                lines.push("Transferability:".to_string());
                for (name, score) in &snapshot.transferability {
                    lines.push(format!("  {:<12} {:.2}", name, score));
                }
            }
        }

        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(items: &[&str], accomplishments: u64) -> SimulateCommand {
        SimulateCommand::new(
            items.iter().map(|s| s.to_string()).collect(),
            accomplishments,
            Config::default(),
        )
    }

    #[test]
    fn test_simulate_advances_one_state_per_step() {
        let cmd = command(&["Java", "TypeScript"], 18);
        let options = SimulateOptions {
            steps: 4,
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(output.success);
        assert_eq!(output.steps.len(), 4);
        let names: Vec<_> = output
            .steps
            .iter()
            .map(|s| s.transition.to.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["EXPLORATION", "INTEGRATION", "MASTERY", "MASTERY"]
        );
        assert_eq!(output.steps[0].accomplishments, 19);
        assert!(output.snapshot.unwrap().terminal);
    }

    #[test]
    fn test_simulate_below_cutoff_holds() {
        let cmd = command(&["Java"], 0);
        let options = SimulateOptions {
            steps: 3,
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(output.success);
        assert!(output.steps.iter().all(|s| !s.transition.advanced()));
        assert_eq!(output.snapshot.unwrap().state.name, "INITIALIZATION");
    }

    #[test]
    fn test_simulate_with_optimize_reports_reinforcement() {
        let cmd = command(&["Java", "TypeScript"], 0);
        let options = SimulateOptions {
            steps: 1,
            optimize: true,
            ..Default::default()
        };

        let output = cmd.run(&options);
        let reinforcement = output.steps[0].reinforcement.as_ref().unwrap();

        assert!(reinforcement.validated);
        assert!(reinforcement.adjustments.is_empty());
    }

    #[test]
    fn test_simulate_rejects_blank_item() {
        let output = command(&["Java", " "], 0).run(&SimulateOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("blank"));
    }

    #[test]
    fn test_simulate_rejects_too_many_steps() {
        let cmd = command(&["Java"], 0);
        let options = SimulateOptions {
            steps: usize::MAX,
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(!output.success);
        assert!(output.steps.is_empty());
        assert!(output.error.unwrap().contains("steps must be at most"));
    }

    #[test]
    fn test_simulate_accepts_step_limit() {
        let cmd = command(&["Java"], 0);
        let options = SimulateOptions {
            steps: MAX_STEPS,
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(output.success);
        assert_eq!(output.steps.len(), MAX_STEPS);
    }

    #[test]
    fn test_simulate_rejects_invalid_config() {
        let mut config = Config::default();
        config.engine.advancement_cutoff = 3.0;
        let cmd = SimulateCommand::new(vec!["Java".to_string()], 0, config);

        assert!(!cmd.run(&SimulateOptions::default()).success);
    }

    #[test]
    fn test_format_output_quiet() {
        let cmd = command(&["Java"], 0);
        let options = SimulateOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }

    #[test]
    fn test_format_output_json() {
        let cmd = command(&["Java"], 0);
        let options = SimulateOptions {
            json: true,
            steps: 2,
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        let parsed: serde_json::Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["steps"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["steps"][0]["transition"]["reason"], "below_cutoff");
        assert_eq!(parsed["snapshot"]["state"]["name"], "INITIALIZATION");
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = command(&["Java", "TypeScript"], 18);
        let options = SimulateOptions {
            steps: 1,
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);

        assert!(formatted.contains("INITIALIZATION -> EXPLORATION"));
        assert!(formatted.contains("Final state: EXPLORATION"));
        assert!(formatted.contains("TypeScript"));
    }

    #[test]
    fn test_format_failure() {
        let cmd = command(&["Java"], 0);
        let output = SimulateOutput::failure("boom");

        let formatted = cmd.format_output(&output, &SimulateOptions::default());

        assert_eq!(formatted, "Simulation failed: boom\n");
    }
}

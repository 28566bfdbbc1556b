//! Ladder - Adaptive Threshold-Gated State Progression Engine
//!
//! CLI entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ladder::cli::profile_cmd::{ProfileCommand, ProfileOptions};
use ladder::cli::simulate::{SimulateCommand, SimulateOptions, MAX_STEPS};
use ladder::cli::validate::{ValidateCommand, ValidateOptions};
use ladder::config::Config;
use ladder::error::exit_codes;

// =============================================================================
// CLI Definition
// =============================================================================

/// Ladder - Adaptive Threshold-Gated State Progression Engine
#[derive(Parser)]
#[command(name = "ladder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run transitions over a skill portfolio
    Simulate {
        /// Tracked items, comma separated
        #[arg(long, short, value_delimiter = ',', default_value = "Java,TypeScript")]
        items: Vec<String>,
        /// Accomplishments recorded before the first step
        #[arg(long, short, default_value_t = 0)]
        accomplishments: u64,
        /// Number of transition attempts
        #[arg(
            long,
            short,
            default_value_t = 5,
            value_parser = clap::value_parser!(u64).range(0..=MAX_STEPS as u64)
        )]
        steps: u64,
        /// Accomplishments recorded before each attempt
        #[arg(long, default_value_t = 1)]
        per_step: u64,
        /// Reinforce after each attempt
        #[arg(long)]
        optimize: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Validate a cognitive profile against each state's thresholds
    Validate {
        /// Learning efficiency, in [0.0, 1.0]
        #[arg(long, short)]
        efficiency: f64,
        /// Mental load capacity, in [0.0, 1.0]
        #[arg(long, short)]
        load: f64,
        /// Adaptation rate, in [0.0, 1.0]
        #[arg(long, short, default_value_t = 0.0)]
        adaptation: f64,
        /// Only check this state
        #[arg(long)]
        state: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the effective profile and configuration
    Profile {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ladder error: {}", e);
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

/// Install the stderr log subscriber, filtered by `LADDER_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LADDER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(ExitCode::from(parse_error_exit_code(&e) as u8));
        }
    };
    let config = Config::load();

    match cli.command {
        Commands::Simulate {
            items,
            accomplishments,
            steps,
            per_step,
            optimize,
            json,
            quiet,
        } => {
            let options = SimulateOptions {
                json,
                quiet,
                steps: steps as usize,
                per_step,
                optimize,
            };
            run_simulate(items, accomplishments, &options, config)
        }
        Commands::Validate {
            efficiency,
            load,
            adaptation,
            state,
            json,
            quiet,
        } => {
            let options = ValidateOptions { json, quiet, state };
            run_validate(efficiency, load, adaptation, &options, config)
        }
        Commands::Profile { json, quiet } => run_profile(&ProfileOptions { json, quiet }, config),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// `--help` and `--version` surface as parse errors but are not failures.
fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        exit_codes::USAGE
    } else {
        exit_codes::SUCCESS
    }
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::FAILURE as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        print!("{}", formatted);
        if !formatted.ends_with('\n') {
            println!();
        }
    }
}

fn run_simulate(
    items: Vec<String>,
    accomplishments: u64,
    options: &SimulateOptions,
    config: Config,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = SimulateCommand::new(items, accomplishments, config);

    let output = cmd.run(options);
    print_formatted(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

fn run_validate(
    efficiency: f64,
    load: f64,
    adaptation: f64,
    options: &ValidateOptions,
    config: Config,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ValidateCommand::new(efficiency, load, adaptation, config);

    let output = cmd.run(options);
    print_formatted(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

fn run_profile(
    options: &ProfileOptions,
    config: Config,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ProfileCommand::new(config);

    let output = cmd.run(options);
    print_formatted(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================

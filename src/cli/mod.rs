//! CLI commands for Ladder.
//!
//! Each command follows the same shape: an options struct, a serializable
//! output with success and failure constructors, and a command struct with
//! `run` and `format_output`.

pub mod profile_cmd;
pub mod simulate;
pub mod validate;

pub use profile_cmd::ProfileCommand;
pub use simulate::SimulateCommand;
pub use validate::ValidateCommand;

//! Unified error types for Ladder.
//!
//! Errors split into two families. Construction errors (bad state names,
//! malformed threshold tables, out-of-range metrics) are contract violations
//! and are always surfaced to the caller. Infrastructure errors (config files)
//! follow the fail-open rule: log a warning and continue with defaults.
//!
//! Domain no-ops such as advancing past the terminal state are not errors and
//! never appear here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Ladder operations.
#[derive(Error, Debug)]
pub enum LadderError {
    /// Initial or queried state is not a member of the state sequence.
    #[error("unknown state: {name}")]
    UnknownState { name: String },

    /// State sequence is empty or contains duplicates.
    #[error("invalid state sequence: {message}")]
    InvalidSequence { message: String },

    /// Threshold table does not line up with its state sequence or is not
    /// monotonically non-decreasing.
    #[error("invalid threshold table: {message}")]
    InvalidThresholds { message: String },

    /// A metric or tuning parameter is outside its declared domain.
    #[error("{name} out of range: {value} ({expected})")]
    OutOfRange {
        name: String,
        value: f64,
        expected: String,
    },

    /// A metric source was built from malformed input.
    #[error("invalid metric: {message}")]
    InvalidMetric { message: String },

    /// I/O errors from config file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for Ladder operations.
pub type Result<T> = std::result::Result<T, LadderError>;

impl LadderError {
    /// Create an unknown state error.
    pub fn unknown_state(name: impl Into<String>) -> Self {
        Self::UnknownState { name: name.into() }
    }

    /// Create an invalid sequence error.
    pub fn invalid_sequence(message: impl Into<String>) -> Self {
        Self::InvalidSequence {
            message: message.into(),
        }
    }

    /// Create an invalid threshold table error.
    pub fn invalid_thresholds(message: impl Into<String>) -> Self {
        Self::InvalidThresholds {
            message: message.into(),
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(name: impl Into<String>, value: f64, expected: impl Into<String>) -> Self {
        Self::OutOfRange {
            name: name.into(),
            value,
            expected: expected.into(),
        }
    }

    /// Create an invalid metric error.
    pub fn invalid_metric(message: impl Into<String>) -> Self {
        Self::InvalidMetric {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error came from bad construction input.
    ///
    /// Construction errors are programmer-visible contract violations and
    /// must not be swallowed by fail-open handling.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::UnknownState { .. }
                | Self::InvalidSequence { .. }
                | Self::InvalidThresholds { .. }
                | Self::OutOfRange { .. }
                | Self::InvalidMetric { .. }
        )
    }
}

/// Check that a scalar is finite and inside `[0.0, 1.0]`.
pub(crate) fn ensure_unit(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(LadderError::out_of_range(name, value, "expected [0.0, 1.0]"))
    }
}

/// Trait for fail-open error handling.
///
/// Used on infrastructure paths only: log the error and carry on with a
/// safe default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the Ladder CLI.
pub mod exit_codes {
    /// Command succeeded.
    pub const SUCCESS: i32 = 0;

    /// Command failed on invalid input.
    pub const FAILURE: i32 = 1;

    /// Command line could not be parsed.
    pub const USAGE: i32 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_state_display() {
        let err = LadderError::unknown_state("LIMBO");
        assert_eq!(err.to_string(), "unknown state: LIMBO");
    }

    #[test]
    fn test_invalid_sequence_display() {
        let err = LadderError::invalid_sequence("sequence is empty");
        assert_eq!(err.to_string(), "invalid state sequence: sequence is empty");
    }

    #[test]
    fn test_invalid_thresholds_display() {
        let err = LadderError::invalid_thresholds("MASTERY lowers efficiency");
        assert!(err.to_string().contains("invalid threshold table"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = LadderError::out_of_range("mental_load_capacity", 1.5, "expected [0.0, 1.0]");
        assert_eq!(
            err.to_string(),
            "mental_load_capacity out of range: 1.5 (expected [0.0, 1.0])"
        );
    }

    #[test]
    fn test_storage_error_display() {
        let err = LadderError::storage(
            "/tmp/config.toml",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_config_error_display() {
        let err = LadderError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_is_construction() {
        assert!(LadderError::unknown_state("x").is_construction());
        assert!(LadderError::invalid_sequence("x").is_construction());
        assert!(LadderError::invalid_thresholds("x").is_construction());
        assert!(LadderError::out_of_range("x", 2.0, "x").is_construction());
        assert!(LadderError::invalid_metric("x").is_construction());
        assert!(!LadderError::config("x").is_construction());
        assert!(!LadderError::storage("x", io::Error::other("x")).is_construction());
    }

    #[test]
    fn test_ensure_unit() {
        assert!(ensure_unit("v", 0.0).is_ok());
        assert!(ensure_unit("v", 1.0).is_ok());
        assert!(ensure_unit("v", -0.01).is_err());
        assert!(ensure_unit("v", 1.01).is_err());
        assert!(ensure_unit("v", f64::NAN).is_err());
        assert!(ensure_unit("v", f64::INFINITY).is_err());
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(LadderError::config("test"));
        let value = result.fail_open_default("test context");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<i32> = Err(LadderError::config("test"));
        assert_eq!(result.fail_open_with("test context", 42), 42);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_default("test context"), 100);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::FAILURE, 1);
        assert_eq!(exit_codes::USAGE, 2);
    }
}

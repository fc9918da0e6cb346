use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Main library error type covering every way a validation run can fail
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start validator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Validator exited with {}", describe_exit(.code))]
    ProcessFailed { code: Option<i32> },

    #[error("Failed to write report: {path} - {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid target pattern: {pattern} - {details}")]
    Discovery { pattern: String, details: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ValidatorError {
    /// Exit code reported by the validator process, if it ran at all
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ValidatorError::ProcessFailed { code } => *code,
            _ => None,
        }
    }

    /// True when the validator ran and reported a failure (as opposed to a wrapper-side error)
    pub fn is_process_failure(&self) -> bool {
        matches!(self, ValidatorError::ProcessFailed { .. })
    }
}

impl From<ConfigError> for ValidatorError {
    fn from(err: ConfigError) -> Self {
        ValidatorError::Config(err.to_string())
    }
}

/// A failed validation run: the error plus the diagnostic text the validator produced.
///
/// `output` is the validator's stderr, already rendered as an HTML report when
/// the run was requested with the `html` meta-format.
#[derive(Error, Debug)]
#[error("Validation run failed")]
pub struct ValidationFailure {
    #[source]
    pub error: ValidatorError,
    pub output: String,
}

impl ValidationFailure {
    pub fn new(error: ValidatorError, output: impl Into<String>) -> Self {
        Self {
            error,
            output: output.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidatorError>;

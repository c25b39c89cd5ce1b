// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::RunResult;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// Invalid or missing invocation input (flags, environment).
    #[error("{0}")]
    Argument(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Application '{program}' not found: {reason}")]
    ExecutableNotFound { program: String, reason: String },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid output pattern: {0}")]
    RegexError(#[from] regex::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarnessError {
    /// The terminal result an invocation ends with when this error aborts it.
    pub fn run_result(&self) -> RunResult {
        match self {
            HarnessError::Argument(_)
            | HarnessError::ConfigError(_)
            | HarnessError::TomlError(_)
            | HarnessError::RegexError(_) => RunResult::ArgumentError,
            HarnessError::ExecutableNotFound { .. }
            | HarnessError::Spawn { .. }
            | HarnessError::IoError(_)
            | HarnessError::Other(_) => RunResult::ExecutionError,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;

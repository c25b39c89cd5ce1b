// src/logging.rs

//! Diagnostic logging for the harness itself.
//!
//! The console contract (executed command, application output, notices and
//! the result line) is plain stdout. Everything logged through `tracing`
//! goes to stderr so CI logs can be filtered independently.
//!
//! Filter selection:
//! 1. `--log-level` sets a single level for everything.
//! 2. Otherwise `APPTEST_LOG` is read as full `EnvFilter` directives, e.g.
//!    `apptest::engine=debug,warn`.
//! 3. Otherwise only warnings and errors are shown.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::errors::{HarnessError, Result};

pub const LOG_ENV_VAR: &str = "APPTEST_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the global subscriber. Malformed `APPTEST_LOG` directives are an
/// [`HarnessError::Argument`].
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let filter = log_filter(cli_level, env_value.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| HarnessError::Other(anyhow::anyhow!("failed to initialise logging: {e}")))
}

/// Pick the filter from the CLI level, then the `APPTEST_LOG` value, then the
/// default.
pub fn log_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    match (cli_level, env_value) {
        (Some(level), _) => Ok(EnvFilter::new(level.as_directive())),
        (None, Some(directives)) => EnvFilter::try_new(directives).map_err(|e| {
            HarnessError::Argument(format!("invalid {LOG_ENV_VAR} value '{directives}': {e}."))
        }),
        (None, None) => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

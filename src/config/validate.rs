// src/config/validate.rs

use std::time::Duration;

use regex::Regex;

use crate::config::model::{HarnessFile, RawHarnessFile};
use crate::errors::{HarnessError, Result};
use crate::exec::{CommandTemplate, Placeholder};

impl TryFrom<RawHarnessFile> for HarnessFile {
    type Error = HarnessError;

    fn try_from(raw: RawHarnessFile) -> std::result::Result<Self, Self::Error> {
        let template = match &raw.harness.command {
            Some(tokens) => CommandTemplate::parse(tokens)?,
            None => CommandTemplate::default(),
        };
        if !template.mentions(Placeholder::Path) {
            tracing::warn!("[harness].command does not reference {{path}}; --path and --tool are ignored");
        }

        let timeout = raw
            .harness
            .timeout
            .map(timeout_from_secs)
            .transpose()
            .map_err(|e| HarnessError::ConfigError(format!("[harness].timeout: {e}")))?;

        if raw.harness.api_key_env.trim().is_empty() {
            return Err(HarnessError::ConfigError(
                "[harness].api_key_env must not be empty".to_string(),
            ));
        }

        let fail_on_stdout = raw
            .classify
            .fail_on_stdout
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(HarnessFile {
            template,
            timeout,
            unbuffered: raw.harness.unbuffered,
            api_key_env: raw.harness.api_key_env,
            fail_on_stdout,
        })
    }
}

/// Convert a timeout in seconds, rejecting zero, negative and non-finite
/// values.
pub fn timeout_from_secs(secs: f64) -> Result<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(HarnessError::Argument(format!(
            "timeout must be greater than zero (got {secs})."
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| HarnessError::Argument(format!("invalid timeout {secs}: {e}.")))
}

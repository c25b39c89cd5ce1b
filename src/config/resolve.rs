// src/config/resolve.rs

//! Turns CLI arguments, the optional harness file and the environment into
//! one immutable [`RunConfiguration`].
//!
//! Precedence, highest first: environment (API key only), CLI flags, harness
//! file, built-in defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::config::model::{HarnessFile, RunConfiguration};
use crate::config::validate::timeout_from_secs;
use crate::errors::{HarnessError, Result};
use crate::types::BuildTool;

/// Maximum length of the unique ID passed to the application.
pub const MAX_UNIQUE_ID_LEN: usize = 36;

/// Default maximum run duration.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// A unique ID after length normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedId {
    pub value: String,
    pub truncated: bool,
}

/// Truncate `id` to its first [`MAX_UNIQUE_ID_LEN`] characters.
pub fn normalize_unique_id(id: &str) -> NormalizedId {
    if id.chars().count() > MAX_UNIQUE_ID_LEN {
        NormalizedId {
            value: id.chars().take(MAX_UNIQUE_ID_LEN).collect(),
            truncated: true,
        }
    } else {
        NormalizedId {
            value: id.to_string(),
            truncated: false,
        }
    }
}

/// Where `tool` puts the built `application` under `root`.
pub fn default_application_path(root: &Path, tool: BuildTool, application: &str) -> PathBuf {
    root.join(tool.output_dir()).join(application)
}

/// Result of resolution: the configuration plus console notices (e.g. the
/// unique-ID truncation warning) the caller should print before the run.
#[derive(Debug)]
pub struct Resolved {
    pub config: RunConfiguration,
    pub notices: Vec<String>,
}

/// Resolve the run configuration.
///
/// `env` looks up environment variables; production passes
/// `|k| std::env::var(k).ok()`.
pub fn resolve_run_configuration<E>(
    args: &CliArgs,
    harness: HarnessFile,
    env: E,
) -> Result<Resolved>
where
    E: Fn(&str) -> Option<String>,
{
    let mut notices = Vec::new();

    let api_key = match env(&harness.api_key_env) {
        Some(key) => {
            debug!(var = %harness.api_key_env, "API key taken from environment");
            key
        }
        None => args
            .api_key
            .clone()
            .ok_or_else(|| HarnessError::Argument("API key not specified.".to_string()))?,
    };

    let path = match &args.path {
        Some(p) => p.clone(),
        None => default_application_path(&args.root_dir, args.tool, &args.application),
    };

    let requested_id = args
        .unique_id
        .clone()
        .unwrap_or_else(|| format!("test_{}", args.application));
    let unique_id = normalize_unique_id(&requested_id);
    if unique_id.truncated {
        warn!(max = MAX_UNIQUE_ID_LEN, "unique ID too long; truncating");
        notices.push(format!(
            "Unique ID too long. Truncating to '{}'.",
            unique_id.value
        ));
    }

    let timeout = match (args.timeout, harness.timeout) {
        (Some(secs), _) => timeout_from_secs(secs)?,
        (None, Some(t)) => t,
        (None, None) => timeout_from_secs(DEFAULT_TIMEOUT_SECS)?,
    };

    let config = RunConfiguration {
        application: args.application.clone(),
        path,
        api_key,
        unique_id: unique_id.value,
        timeout,
        program_args: args.program_args.clone(),
        template: harness.template,
        fail_on_stdout: harness.fail_on_stdout,
        unbuffered: harness.unbuffered,
    };
    debug!(?config, "resolved run configuration");

    Ok(Resolved { config, notices })
}

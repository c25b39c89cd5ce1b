// src/lib.rs

pub mod classify;
pub mod cli;
pub mod config;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::{HarnessFile, load_and_validate, resolve_run_configuration};
use crate::console::{Console, StdoutConsole};
use crate::engine::Supervisor;
use crate::errors::Result;
use crate::types::RunResult;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the optional harness file
/// - CLI/environment resolution into a `RunConfiguration`
/// - the supervisor for the single run
///
/// Returns the terminal result rather than exiting, so test suites can embed
/// the harness. Configuration problems come back as `Err`; map them with
/// [`HarnessError::run_result`](crate::errors::HarnessError::run_result).
pub async fn run(args: CliArgs) -> Result<RunResult> {
    let harness = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => HarnessFile::default(),
    };

    let resolved = resolve_run_configuration(&args, harness, |key| std::env::var(key).ok())?;

    let mut console = StdoutConsole;
    for notice in &resolved.notices {
        console.line(notice);
    }

    info!(
        application = %resolved.config.application,
        path = %resolved.config.path.display(),
        timeout = ?resolved.config.timeout,
        "starting test run"
    );

    let supervisor = Supervisor::new(resolved.config, console);
    Ok(supervisor.run().await)
}

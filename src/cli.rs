// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::BuildTool;

/// Command-line arguments for `apptest`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "apptest",
    version,
    about = "Run an application under test, stream its output and report pass/fail.",
    long_about = None
)]
pub struct CliArgs {
    /// Name of the application under test.
    ///
    /// Used to compute the default application path and unique ID.
    #[arg(value_name = "APPLICATION")]
    pub application: String,

    /// The path to the application to be run.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// The API key to be used.
    ///
    /// Ignored if the API key environment variable (default
    /// `POLARIS_API_KEY`) is set.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// The maximum test duration (in seconds). Default: 30.0.
    #[arg(short = 't', long, value_name = "SEC")]
    pub timeout: Option<f64>,

    /// The tool used to compile the application, used to determine the
    /// default application path. Ignored if `--path` is specified.
    #[arg(long, value_enum, value_name = "TOOL", default_value_t = BuildTool::Bazel)]
    pub tool: BuildTool,

    /// Project root that default application paths are relative to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root_dir: PathBuf,

    /// The unique ID to assign to this instance (at most 36 characters).
    ///
    /// Default: `test_<APPLICATION>`.
    #[arg(long, value_name = "ID")]
    pub unique_id: Option<String>,

    /// Optional harness file (TOML) with the command template and output
    /// classification patterns.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `APPTEST_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Extra arguments appended to the application command line.
    #[arg(last = true, value_name = "ARGS")]
    pub program_args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

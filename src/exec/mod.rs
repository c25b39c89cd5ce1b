// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] turns a command template plus the run configuration into an
//!   argv (and a redacted display string).
//! - [`launcher`] starts the application with merged, unbuffered output in
//!   its own process group.
//! - [`monitor`] reads the combined output stream line by line.

pub mod command;
pub mod launcher;
pub mod monitor;

pub use command::{CommandLine, CommandTemplate, Placeholder, REDACTED_API_KEY};
pub use launcher::{ChildProcess, LaunchOptions, launch};
pub use monitor::{MonitorRead, OutputMonitor};

// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::exec::CommandTemplate;

/// Harness file as read from TOML, before validation.
///
/// ```toml
/// [harness]
/// command = ["{path}", "{api_key}", "{unique_id}"]
/// timeout = 30.0
/// unbuffered = true
/// api_key_env = "POLARIS_API_KEY"
///
/// [classify]
/// fail_on_stdout = ["^ERROR", "assertion failed"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawHarnessFile {
    #[serde(default)]
    pub harness: HarnessSection,

    #[serde(default)]
    pub classify: ClassifySection,
}

/// `[harness]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HarnessSection {
    /// Command template; `None` means `["{path}", "{api_key}", "{unique_id}"]`.
    #[serde(default)]
    pub command: Option<Vec<String>>,

    /// Maximum run duration in seconds; `--timeout` takes precedence.
    #[serde(default)]
    pub timeout: Option<f64>,

    /// Wrap the application in `stdbuf -o0`.
    #[serde(default = "default_unbuffered")]
    pub unbuffered: bool,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_unbuffered() -> bool {
    true
}

pub fn default_api_key_env() -> String {
    "POLARIS_API_KEY".to_string()
}

impl Default for HarnessSection {
    fn default() -> Self {
        Self {
            command: None,
            timeout: None,
            unbuffered: default_unbuffered(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// `[classify]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassifySection {
    /// Regexes; any matching output line marks the run as failed.
    #[serde(default)]
    pub fail_on_stdout: Vec<String>,
}

/// Validated harness settings.
///
/// Built from [`RawHarnessFile`] via `TryFrom`, or `Default` when no file is
/// given.
#[derive(Debug, Clone)]
pub struct HarnessFile {
    pub template: CommandTemplate,
    pub timeout: Option<Duration>,
    pub unbuffered: bool,
    pub api_key_env: String,
    pub fail_on_stdout: Vec<Regex>,
}

impl Default for HarnessFile {
    fn default() -> Self {
        Self {
            template: CommandTemplate::default(),
            timeout: None,
            unbuffered: default_unbuffered(),
            api_key_env: default_api_key_env(),
            fail_on_stdout: Vec::new(),
        }
    }
}

/// Everything one run needs, resolved once per invocation and never mutated.
#[derive(Clone)]
pub struct RunConfiguration {
    pub application: String,
    pub path: PathBuf,
    pub api_key: String,
    pub unique_id: String,
    pub timeout: Duration,
    pub program_args: Vec<String>,
    pub template: CommandTemplate,
    pub fail_on_stdout: Vec<Regex>,
    pub unbuffered: bool,
}

// Omits the API key.
impl fmt::Debug for RunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfiguration")
            .field("application", &self.application)
            .field("path", &self.path)
            .field("unique_id", &self.unique_id)
            .field("timeout", &self.timeout)
            .field("program_args", &self.program_args)
            .field("fail_on_stdout", &self.fail_on_stdout)
            .field("unbuffered", &self.unbuffered)
            .finish_non_exhaustive()
    }
}

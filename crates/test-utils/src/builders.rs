#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use apptest::cli::CliArgs;
use apptest::config::RunConfiguration;
use apptest::exec::CommandTemplate;
use apptest::types::BuildTool;
use regex::Regex;

use crate::script::TestApp;

/// Builder for `RunConfiguration` to simplify test setup.
pub struct RunConfigurationBuilder {
    config: RunConfiguration,
}

impl RunConfigurationBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfiguration {
                application: "test_app".to_string(),
                path: path.into(),
                api_key: "secret-key".to_string(),
                unique_id: "test_test_app".to_string(),
                timeout: Duration::from_secs(10),
                program_args: Vec::new(),
                template: CommandTemplate::default(),
                fail_on_stdout: Vec::new(),
                unbuffered: true,
            },
        }
    }

    /// Configuration running `app` through `/bin/sh`.
    pub fn for_script(app: &TestApp) -> Self {
        Self::new(app.path()).template(&TestApp::template())
    }

    pub fn template(mut self, tokens: &[String]) -> Self {
        self.config.template = CommandTemplate::parse(tokens).expect("valid command template");
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.config.api_key = key.to_string();
        self
    }

    pub fn unique_id(mut self, id: &str) -> Self {
        self.config.unique_id = id.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.config.program_args.push(arg.to_string());
        self
    }

    pub fn fail_on_stdout(mut self, pattern: &str) -> Self {
        self.config
            .fail_on_stdout
            .push(Regex::new(pattern).expect("valid pattern"));
        self
    }

    pub fn unbuffered(mut self, val: bool) -> Self {
        self.config.unbuffered = val;
        self
    }

    pub fn build(self) -> RunConfiguration {
        self.config
    }
}

/// Builder for `CliArgs` without going through argv parsing.
pub struct CliArgsBuilder {
    args: CliArgs,
}

impl CliArgsBuilder {
    pub fn new(application: &str) -> Self {
        Self {
            args: CliArgs {
                application: application.to_string(),
                path: None,
                api_key: None,
                timeout: None,
                tool: BuildTool::Bazel,
                root_dir: PathBuf::from("."),
                unique_id: None,
                config: None,
                log_level: None,
                program_args: Vec::new(),
            },
        }
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.args.path = Some(path.into());
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.args.api_key = Some(key.to_string());
        self
    }

    pub fn timeout(mut self, secs: f64) -> Self {
        self.args.timeout = Some(secs);
        self
    }

    pub fn tool(mut self, tool: BuildTool) -> Self {
        self.args.tool = tool;
        self
    }

    pub fn root_dir(mut self, dir: &Path) -> Self {
        self.args.root_dir = dir.to_path_buf();
        self
    }

    pub fn unique_id(mut self, id: &str) -> Self {
        self.args.unique_id = Some(id.to_string());
        self
    }

    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.args.config = Some(path.into());
        self
    }

    pub fn program_arg(mut self, arg: &str) -> Self {
        self.args.program_args.push(arg.to_string());
        self
    }

    pub fn build(self) -> CliArgs {
        self.args
    }
}

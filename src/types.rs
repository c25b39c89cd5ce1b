use std::fmt;

use clap::ValueEnum;

/// Terminal outcome of one invocation.
///
/// The discriminants are the process exit codes reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunResult {
    Passed = 0,
    Failed = 1,
    ArgumentError = 2,
    ExecutionError = 3,
    NonzeroExit = 4,
}

impl RunResult {
    pub fn exit_code(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, RunResult::Passed)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunResult::Passed => "passed",
            RunResult::Failed => "failed",
            RunResult::ArgumentError => "argument error",
            RunResult::ExecutionError => "execution error",
            RunResult::NonzeroExit => "non-zero exit",
        };
        f.write_str(s)
    }
}

/// Build tool used to compile the application; selects the default path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuildTool {
    #[default]
    Bazel,
    Cmake,
    Make,
}

impl BuildTool {
    /// Output directory (relative to the project root) holding the example
    /// applications built by this tool.
    pub fn output_dir(self) -> &'static str {
        match self {
            BuildTool::Bazel => "bazel-bin/examples",
            BuildTool::Cmake => "build/examples",
            BuildTool::Make => "examples",
        }
    }
}

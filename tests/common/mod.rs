#![allow(dead_code, unused_imports)]

pub use apptest_test_utils::builders::{CliArgsBuilder, RunConfigurationBuilder};
pub use apptest_test_utils::console::RecordingConsole;
pub use apptest_test_utils::script::TestApp;
pub use apptest_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

mod common;
use crate::common::{TestResult, init_tracing};

use std::fs;
use std::time::Duration;

use apptest::config::{load_and_validate, load_from_path};
use apptest::errors::HarnessError;
use apptest::exec::Placeholder;
use apptest::types::RunResult;
use tempfile::TempDir;

fn write_harness(contents: &str) -> Result<(TempDir, std::path::PathBuf), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("apptest.toml");
    fs::write(&path, contents)?;
    Ok((dir, path))
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    init_tracing();
    let (_dir, path) = write_harness("")?;

    let harness = load_and_validate(&path)?;

    assert!(harness.template.mentions(Placeholder::Path));
    assert!(harness.template.mentions(Placeholder::ApiKey));
    assert_eq!(harness.timeout, None);
    assert!(harness.unbuffered);
    assert_eq!(harness.api_key_env, "POLARIS_API_KEY");
    assert!(harness.fail_on_stdout.is_empty());
    Ok(())
}

#[test]
fn full_file_is_loaded() -> TestResult {
    let (_dir, path) = write_harness(
        r#"
[harness]
command = ["/usr/bin/env", "{path}", "--key={api_key}", "{unique_id}"]
timeout = 12.5
unbuffered = false
api_key_env = "CI_POLARIS_KEY"

[classify]
fail_on_stdout = ["^ERROR", "assertion failed"]
"#,
    )?;

    let harness = load_and_validate(&path)?;

    assert_eq!(harness.timeout, Some(Duration::from_millis(12_500)));
    assert!(!harness.unbuffered);
    assert_eq!(harness.api_key_env, "CI_POLARIS_KEY");
    assert_eq!(harness.fail_on_stdout.len(), 2);
    assert!(harness.fail_on_stdout[0].is_match("ERROR: oops"));
    Ok(())
}

#[test]
fn raw_file_keeps_unvalidated_values() -> TestResult {
    let (_dir, path) = write_harness("[harness]\ncommand = [\"{bogus}\"]\n")?;

    let raw = load_from_path(&path)?;

    assert_eq!(raw.harness.command, Some(vec!["{bogus}".to_string()]));
    Ok(())
}

#[test]
fn unknown_placeholder_is_rejected() -> TestResult {
    let (_dir, path) = write_harness("[harness]\ncommand = [\"{path}\", \"{token}\"]\n")?;

    let err = load_and_validate(&path).expect_err("unknown placeholder");

    assert!(matches!(err, HarnessError::ConfigError(_)));
    assert_eq!(err.run_result(), RunResult::ArgumentError);
    Ok(())
}

#[test]
fn zero_timeout_in_file_is_rejected() -> TestResult {
    let (_dir, path) = write_harness("[harness]\ntimeout = 0.0\n")?;

    let err = load_and_validate(&path).expect_err("zero timeout");

    assert!(matches!(err, HarnessError::ConfigError(_)));
    assert!(err.to_string().contains("[harness].timeout"));
    Ok(())
}

#[test]
fn empty_key_variable_name_is_rejected() -> TestResult {
    let (_dir, path) = write_harness("[harness]\napi_key_env = \"  \"\n")?;

    let err = load_and_validate(&path).expect_err("empty api_key_env");

    assert!(matches!(err, HarnessError::ConfigError(_)));
    Ok(())
}

#[test]
fn invalid_pattern_is_rejected() -> TestResult {
    let (_dir, path) = write_harness("[classify]\nfail_on_stdout = [\"(unclosed\"]\n")?;

    let err = load_and_validate(&path).expect_err("invalid regex");

    assert!(matches!(err, HarnessError::RegexError(_)));
    assert_eq!(err.run_result(), RunResult::ArgumentError);
    Ok(())
}

#[test]
fn malformed_toml_is_rejected() -> TestResult {
    let (_dir, path) = write_harness("[harness\ncommand = 3")?;

    let err = load_and_validate(&path).expect_err("bad toml");

    assert!(matches!(err, HarnessError::TomlError(_)));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;

    let err = load_and_validate(dir.path().join("absent.toml")).expect_err("missing file");

    assert!(matches!(err, HarnessError::IoError(_)));
    assert_eq!(err.run_result(), RunResult::ExecutionError);
    Ok(())
}

mod common;
use crate::common::TestResult;

use std::path::PathBuf;

use apptest::cli::CliArgs;
use apptest::types::BuildTool;
use clap::Parser;

#[test]
fn minimal_invocation_uses_defaults() -> TestResult {
    let args = CliArgs::try_parse_from(["apptest", "hello"])?;

    assert_eq!(args.application, "hello");
    assert_eq!(args.path, None);
    assert_eq!(args.api_key, None);
    assert_eq!(args.timeout, None);
    assert_eq!(args.tool, BuildTool::Bazel);
    assert_eq!(args.root_dir, PathBuf::from("."));
    assert_eq!(args.unique_id, None);
    assert!(args.program_args.is_empty());
    Ok(())
}

#[test]
fn all_options_are_parsed() -> TestResult {
    let args = CliArgs::try_parse_from([
        "apptest",
        "hello",
        "-p",
        "/opt/hello",
        "--api-key",
        "k",
        "-t",
        "2.5",
        "--tool",
        "cmake",
        "--unique-id",
        "run-1",
        "--config",
        "apptest.toml",
        "--log-level",
        "debug",
        "--",
        "--frames",
        "3",
    ])?;

    assert_eq!(args.path, Some(PathBuf::from("/opt/hello")));
    assert_eq!(args.api_key.as_deref(), Some("k"));
    assert_eq!(args.timeout, Some(2.5));
    assert_eq!(args.tool, BuildTool::Cmake);
    assert_eq!(args.unique_id.as_deref(), Some("run-1"));
    assert_eq!(args.config, Some(PathBuf::from("apptest.toml")));
    assert!(args.log_level.is_some());
    assert_eq!(args.program_args, ["--frames", "3"]);
    Ok(())
}

#[test]
fn unknown_tool_is_a_usage_error() -> TestResult {
    let err = CliArgs::try_parse_from(["apptest", "hello", "--tool", "ninja"])
        .expect_err("ninja is not a supported tool");

    assert_eq!(err.exit_code(), 2);
    Ok(())
}

#[test]
fn missing_application_is_a_usage_error() -> TestResult {
    let err = CliArgs::try_parse_from(["apptest"]).expect_err("application is required");

    assert_eq!(err.exit_code(), 2);
    Ok(())
}

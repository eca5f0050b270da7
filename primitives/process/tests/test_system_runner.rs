#![cfg(unix)]

use std::path::Path;

use process::{CommandRunner, ProcessError, SystemRunner, SPAWN_FAILURE_STATUS};
use types::CommandSpec;

fn sh(script: &str) -> CommandSpec { CommandSpec::new("sh").arg("-c").arg(script) }

#[test]
fn test_capture_buffers_both_streams() {
    let result = SystemRunner
        .capture(&sh("echo out; echo err >&2; exit 0"), Path::new("."))
        .expect("sh should start");
    assert_eq!(result.stdout, "out\n");
    assert_eq!(result.stderr, "err\n");
    assert!(result.success());
}

#[test]
fn test_capture_returns_non_zero_status() {
    let result = SystemRunner.capture(&sh("echo partial; exit 7"), Path::new(".")).expect("start");
    assert_eq!(result.status, 7);
    assert_eq!(result.stdout, "partial\n");
}

#[test]
fn test_run_propagates_status_verbatim() {
    let err = SystemRunner.run(&sh("exit 42"), Path::new(".")).expect_err("non-zero");
    assert!(matches!(err, ProcessError::Failed { status: 42, .. }));
    assert_eq!(err.exit_code(), 42);

    SystemRunner.run(&sh("exit 0"), Path::new(".")).expect("zero exit is success");
}

#[test]
fn test_run_uses_working_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let result = SystemRunner.capture(&sh("pwd"), temp.path()).expect("start");
    let reported = std::fs::canonicalize(result.stdout.trim()).expect("canonical pwd");
    let expected = std::fs::canonicalize(temp.path()).expect("canonical tempdir");
    assert_eq!(reported, expected);
}

#[test]
fn test_missing_program_is_a_spawn_error() {
    let err = SystemRunner
        .capture(&CommandSpec::new("protobridge-definitely-missing-tool"), Path::new("."))
        .expect_err("missing binary");
    assert!(matches!(err, ProcessError::Spawn { .. }));
    assert_eq!(err.exit_code(), SPAWN_FAILURE_STATUS);
}

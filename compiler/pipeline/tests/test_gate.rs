use std::fs;

use config::Options;
use pipeline::{run_test_gate, PipelineError, COVERAGE_PARSE_EXIT_CODE};
use process::testing::{Mode, ScriptedRunner};
use tempfile::TempDir;
use types::RunResult;

const CONFIG: &str = r#"
    [proto]
    source_root = "astral_proto"

    [generate.go]
    output_root = "."
    module = "github.com/example/astral-go"

    [generate.python]
    output_root = "astral_grpc"
    old_prefix = "astral_proto"
    new_prefix = "astral_grpc.astral_proto"

    [reports]
    dir = "reports"

    [testing]
"#;

const PACKAGES: &str = "example.com/a/x\nexample.com/a/y\nexample.com/a/vendor/z\n";
const COVER_OK: &str = "example.com/a/x/x.go:3:\tRun\t90.0%\ntotal:\t(statements)\t85.0%\n";
const COVER_LOW: &str = "total:\t(statements)\t41.5%\n";

fn project(testing: &str) -> (TempDir, Options) {
    let dir = TempDir::new().expect("tempdir");
    let options = Options::parse(&format!("{}\n{}", CONFIG, testing), dir.path())
        .expect("valid test config");
    (dir, options)
}

fn gated() -> (TempDir, Options) { project("coverage_required = 0.8\nexclude = [\"vendor\"]") }

#[test]
fn test_gate_passes_and_persists_logs() {
    let (dir, options) = gated();
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("=== RUN TestX\nok\n", "warning\n", 0))
        .respond(RunResult::new(COVER_OK, "", 0));

    let report = run_test_gate(&options, &runner).expect("gate passes");
    assert_eq!(report.actual, 85.0);
    assert!(report.passed());

    let specs = runner.specs();
    assert_eq!(specs.len(), 3);
    assert_eq!(specs[0].argv(), vec!["go", "list", "./..."]);
    assert!(specs[1]
        .arguments()
        .contains(&"-coverpkg=example.com/a/x,example.com/a/y".to_string()));
    assert_eq!(specs[2].arguments()[..3], ["tool".to_string(), "cover".to_string(), "--func".to_string()]);
    assert!(runner.invocations().iter().all(|i| i.mode == Mode::Capture));

    let reports = dir.path().join("reports");
    let stdout = fs::read_to_string(reports.join("test_stdout.txt")).expect("stdout log");
    assert!(stdout.starts_with("=== RUN TestX\nok\n"));
    assert!(stdout.ends_with(COVER_OK));
    let full = fs::read_to_string(reports.join("test_full.txt")).expect("full log");
    assert!(full.contains("warning"));
    assert!(!full.contains("total:"));
    let stderr = fs::read_to_string(reports.join("test_stderr.txt")).expect("stderr log");
    assert_eq!(stderr, "warning\n");
}

#[test]
fn test_gate_fails_below_threshold() {
    let (_dir, options) = gated();
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new(COVER_LOW, "", 0));

    match run_test_gate(&options, &runner) {
        Err(PipelineError::Threshold { required, actual }) => {
            assert!((required - 80.0).abs() < 1e-9);
            assert_eq!(actual, 41.5);
        }
        other => panic!("expected Threshold, got {:?}", other),
    }
}

#[test]
fn test_failing_tests_abort_with_their_status() {
    let (dir, options) = gated();
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("FAIL\n", "", 3));

    let err = run_test_gate(&options, &runner).expect_err("failing tests are fatal");
    assert_eq!(err.exit_code(), 3);
    assert_eq!(runner.specs().len(), 2);
    let stdout = fs::read_to_string(dir.path().join("reports/test_stdout.txt"))
        .expect("logs are written before aborting");
    assert_eq!(stdout, "FAIL\n");
}

#[test]
fn test_unparsable_coverage_is_distinct_from_threshold_failure() {
    let (_dir, options) = gated();
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new("no summary here\n", "", 0));

    let err = run_test_gate(&options, &runner).expect_err("missing summary is fatal");
    match err {
        PipelineError::Coverage(_) => {}
        ref other => panic!("expected Coverage, got {:?}", other),
    }
    assert_eq!(err.exit_code(), COVERAGE_PARSE_EXIT_CODE);
}

#[test]
fn test_missing_threshold_runs_nothing() {
    let (_dir, options) = project("");
    let runner = ScriptedRunner::new();

    match run_test_gate(&options, &runner) {
        Err(PipelineError::Config(config::ConfigError::MissingKey { key, .. })) => {
            assert_eq!(key, "coverage_required");
        }
        other => panic!("expected MissingKey, got {:?}", other),
    }
    assert!(runner.specs().is_empty());
}

#[test]
fn test_fully_excluded_packages_fall_back_to_selector() {
    let (_dir, options) = project("coverage_required = 0.5\nexclude = [\"example.com\"]");
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new(COVER_OK, "", 0));

    run_test_gate(&options, &runner).expect("gate passes");
    assert!(runner.specs()[1].arguments().contains(&"-coverpkg=./...".to_string()));
}

#[test]
fn test_html_report_runs_after_gate() {
    let (_dir, options) = project("coverage_required = 0.5\nhtml_report = true");
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new(COVER_OK, "", 0));

    run_test_gate(&options, &runner).expect("gate passes");
    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 4);
    assert_eq!(invocations[3].mode, Mode::Run);
    assert!(invocations[3].spec.arguments().iter().any(|a| a.starts_with("-html=")));
}

#[test]
fn test_failing_coverage_report_is_still_logged() {
    let (dir, options) = gated();
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new("partial\n", "cover: bad profile\n", 5));

    let err = run_test_gate(&options, &runner).expect_err("coverage tool failure is fatal");
    assert_eq!(err.exit_code(), 5);

    let reports = dir.path().join("reports");
    let stdout = fs::read_to_string(reports.join("test_stdout.txt")).expect("stdout log");
    assert_eq!(stdout, "ok\npartial\n");
    let stderr = fs::read_to_string(reports.join("test_stderr.txt")).expect("stderr log");
    assert_eq!(stderr, "cover: bad profile\n");
}

#[test]
fn test_threshold_equal_to_reported_coverage_passes() {
    let (_dir, options) = project("coverage_required = 0.56");
    let runner = ScriptedRunner::new()
        .respond(RunResult::new(PACKAGES, "", 0))
        .respond(RunResult::new("ok\n", "", 0))
        .respond(RunResult::new("total:\t(statements)\t56.0%\n", "", 0));

    let report = run_test_gate(&options, &runner).expect("exact threshold passes");
    assert_eq!(report.required, 56.0);
}

//! Test run and coverage gate.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use commands::CommandBuilder;
use config::Options;
use coverage::CoverageReport;
use process::{CommandRunner, ProcessError};
use tracing::{info, warn};
use types::{CommandSpec, RunResult};

use crate::{PipelineError, Result};

/// Drop every package containing any of the `exclude` substrings. Order is preserved.
pub fn filter_packages(packages: &[String], exclude: &[String]) -> Vec<String> {
    packages
        .iter()
        .filter(|package| !exclude.iter().any(|marker| package.contains(marker.as_str())))
        .cloned()
        .collect()
}

/// Run the test suite with coverage instrumentation and gate on the configured threshold.
///
/// Steps, each aborting the rest on failure:
/// 1. resolve the threshold (before any command runs)
/// 2. list packages and apply the exclusion list
/// 3. run the tests and persist their output under the reports directory
/// 4. run the coverage report and append it to the logs
/// 5. compare the reported total with the threshold
pub fn run_test_gate(options: &Options, runner: &dyn CommandRunner) -> Result<CoverageReport> {
    let threshold = options.testing.threshold()?;
    let builder = CommandBuilder::new(options);

    let listed = capture_checked(runner, &builder.list_packages(), &options.root)?;
    let all: Vec<String> = listed
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    let mut packages = filter_packages(&all, &options.testing.exclude);
    if packages.is_empty() {
        warn!("every package was excluded, scoping coverage to {}", options.testing.test_package);
        packages.push(options.testing.test_package.clone());
    }
    info!(listed = all.len(), kept = packages.len(), "filtered packages");

    let reports_dir = options.resolve(&options.reports.dir);
    fs::create_dir_all(&reports_dir)
        .map_err(|source| PipelineError::Report { path: reports_dir.clone(), source })?;

    let tests = runner.capture(&builder.run_tests(&packages), &options.root)?;
    echo(&tests);
    write_report(&options.resolve(&options.reports.stdout_log()), &tests.stdout)?;
    write_report(&options.resolve(&options.reports.stderr_log()), &tests.stderr)?;
    write_report(&options.resolve(&options.reports.full_log()), &tests.combined())?;
    if !tests.success() {
        return Err(failed(&builder.run_tests(&packages), tests.status));
    }

    let cover = runner.capture(&builder.coverage_report(), &options.root)?;
    echo(&cover);
    append_report(&options.resolve(&options.reports.stdout_log()), &cover.stdout)?;
    append_report(&options.resolve(&options.reports.stderr_log()), &cover.stderr)?;
    if !cover.success() {
        return Err(failed(&builder.coverage_report(), cover.status));
    }

    let report = CoverageReport::evaluate(&cover.stdout, threshold.fraction())?;
    if !report.passed() {
        return Err(PipelineError::Threshold { required: report.required, actual: report.actual });
    }
    info!("{}", report);

    if options.testing.html_report {
        runner.run(&builder.coverage_html(), &options.root)?;
    }
    Ok(report)
}

fn capture_checked(runner: &dyn CommandRunner, spec: &CommandSpec, cwd: &Path) -> Result<RunResult> {
    let result = runner.capture(spec, cwd)?;
    if !result.success() {
        echo(&result);
        return Err(failed(spec, result.status));
    }
    Ok(result)
}

fn failed(spec: &CommandSpec, status: i32) -> PipelineError {
    PipelineError::Process(ProcessError::Failed { program: spec.program().to_string(), status })
}

fn echo(result: &RunResult) {
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);
}

fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| PipelineError::Report { path: path.to_path_buf(), source })
}

fn append_report(path: &Path, contents: &str) -> Result<()> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .map_err(|source| PipelineError::Report { path: path.to_path_buf(), source })
}

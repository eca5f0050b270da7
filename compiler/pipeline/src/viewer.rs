//! Opening HTML reports in a browser.

use std::path::PathBuf;

use commands::open_path;
use config::Options;
use process::CommandRunner;

use crate::Result;

const MACOS_VIEWER: &str = "open";
const LINUX_VIEWER: &str = "xdg-open";
const WSL_EDGE: &str = "/mnt/c/Program Files (x86)/Microsoft/Edge/Application/msedge.exe";
const WINDOWS_EDGE: &str = r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe";

/// Platform viewer used when `[tools] viewer` is unset.
pub fn default_viewer() -> String {
    if cfg!(target_os = "macos") {
        MACOS_VIEWER.to_string()
    } else if cfg!(target_os = "linux") {
        match which::which(LINUX_VIEWER) {
            Ok(_) => LINUX_VIEWER.to_string(),
            Err(_) => WSL_EDGE.to_string(),
        }
    } else {
        WINDOWS_EDGE.to_string()
    }
}

fn viewer(options: &Options) -> String {
    options.tools.viewer.clone().unwrap_or_else(default_viewer)
}

fn open_all(options: &Options, runner: &dyn CommandRunner, paths: &[PathBuf]) -> Result<()> {
    let viewer = viewer(options);
    for path in paths {
        runner.run(&open_path(&viewer, path), &options.root)?;
    }
    Ok(())
}

/// Open the coverage and test-result HTML reports.
pub fn open_reports(options: &Options, runner: &dyn CommandRunner) -> Result<()> {
    let reports = &options.reports;
    open_all(options, runner, &[
        options.resolve(&reports.coverage_html()),
        options.resolve(&reports.test_results_html()),
    ])
}

/// Open the documentation index.
pub fn open_docs(options: &Options, runner: &dyn CommandRunner) -> Result<()> {
    open_all(options, runner, &[options.resolve(&options.docs.html_index)])
}

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Argument vectors for every external tool Protobridge drives.
//!
//! Building is pure: nothing here touches the filesystem or spawns a
//! process, and [`Options`] is only read. Flag order is fixed so logged
//! command lines are reproducible.

use std::path::Path;

use config::Options;
use types::{CommandSpec, SourceFile, Target};

/// Final positional argument of the test run: every package.
pub const ALL_PACKAGES_TARGET: &str = "./...";

/// Builds [`CommandSpec`]s from one invocation's options.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    options: &'a Options,
}

impl<'a> CommandBuilder<'a> {
    /// Create a builder reading from `options`.
    pub fn new(options: &'a Options) -> Self { Self { options } }

    /// Schema compiler invocation for `target` over `sources`.
    pub fn generate(&self, target: Target, sources: &[SourceFile]) -> CommandSpec {
        match target {
            Target::Go => self.go_generate(sources),
            Target::Python => self.python_generate(sources),
        }
    }

    /// `protoc --go_out=plugins=grpc:<out> --go_opt=module=<module> <sources...>`
    pub fn go_generate(&self, sources: &[SourceFile]) -> CommandSpec {
        let go = &self.options.go;
        CommandSpec::new(&self.options.tools.protoc)
            .arg(format!("--go_out=plugins=grpc:{}", go.output_root.display()))
            .arg(format!("--go_opt=module={}", go.module))
            .args(relative_paths(sources))
    }

    /// `python3 -m grpc_tools.protoc -I. --python_out=.. --python_grpc_out=.. --mypy_out=.. <sources...>`
    pub fn python_generate(&self, sources: &[SourceFile]) -> CommandSpec {
        let out = self.options.python.output_root.display().to_string();
        CommandSpec::new(&self.options.tools.python)
            .args(["-m", "grpc_tools.protoc", "-I."])
            .arg(format!("--python_out={}", out))
            .arg(format!("--python_grpc_out={}", out))
            .arg(format!("--mypy_out={}", out))
            .args(relative_paths(sources))
    }

    /// Struct tag injection for one generated Go file.
    pub fn inject_tags(&self, file: &Path) -> CommandSpec {
        CommandSpec::new(&self.options.tools.inject_tag)
            .arg(format!("-input={}", file.display()))
            .arg("-XXX_skip=bson")
    }

    /// Enumerate packages matching the configured selector.
    pub fn list_packages(&self) -> CommandSpec {
        CommandSpec::new(&self.options.tools.go).arg("list").arg(&self.options.testing.test_package)
    }

    /// Test run with coverage instrumentation scoped to `packages`.
    pub fn run_tests(&self, packages: &[String]) -> CommandSpec {
        let testing = &self.options.testing;
        let mut spec = CommandSpec::new(&self.options.tools.go)
            .args(["test", "-v", "-failfast"])
            .arg(format!("-timeout={}s", testing.timeout.as_secs()));

        if testing.race_detection {
            spec = spec.arg("-race");
        }
        if !testing.multi_process {
            spec = spec.args(["-p", "1"]);
        }

        spec.arg("-covermode=atomic")
            .arg(format!("-coverprofile={}", self.options.reports.coverage_data().display()))
            .arg(format!("-coverpkg={}", packages.join(",")))
            .arg(ALL_PACKAGES_TARGET)
    }

    /// Per-function coverage summary of the last test run.
    pub fn coverage_report(&self) -> CommandSpec {
        CommandSpec::new(&self.options.tools.go)
            .args(["tool", "cover", "--func"])
            .arg(self.options.reports.coverage_data().display().to_string())
    }

    /// HTML coverage report of the last test run.
    pub fn coverage_html(&self) -> CommandSpec {
        let reports = &self.options.reports;
        CommandSpec::new(&self.options.tools.go)
            .args(["tool", "cover"])
            .arg(format!("-html={}", reports.coverage_data().display()))
            .arg("-o")
            .arg(reports.coverage_html().display().to_string())
    }

    /// HTML documentation for the configured schema files.
    pub fn proto_docs(&self) -> CommandSpec {
        let docs = &self.options.docs;
        CommandSpec::new(&self.options.tools.protoc)
            .arg(format!("--doc_out={}", docs.out_dir))
            .arg("--doc_opt=html,proto.html")
            .args(docs.proto_paths.iter().cloned())
    }
}

/// Open `path` with `viewer`.
pub fn open_path(viewer: &str, path: &Path) -> CommandSpec {
    CommandSpec::new(viewer).arg(path.display().to_string())
}

fn relative_paths(sources: &[SourceFile]) -> impl Iterator<Item = String> + '_ {
    sources.iter().map(|source| source.relative.clone())
}

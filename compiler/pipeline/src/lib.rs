#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that drives the external tools.
//!
//! Every entry point takes the loaded [`config::Options`] and a
//! [`process::CommandRunner`], runs its steps strictly in sequence, and
//! stops at the first fatal error.
//!
//! ## Module Organization
//!
//! - `orchestration` - binding generation and import relocation
//! - `test_orchestration` - package filtering, test run and coverage gate
//! - `docs` - schema documentation and the project name lookup
//! - `viewer` - opening HTML reports in a browser

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Exit status for failures that carry no status of their own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit status when the coverage report has no summary line.
pub const COVERAGE_PARSE_EXIT_CODE: i32 = 2;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or malformed configuration.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Schema sources or generated files could not be located.
    #[error(transparent)]
    Discovery(#[from] path::DiscoveryError),
    /// Discovery found nothing to compile.
    #[error("No schema sources found under {0}")]
    NoSources(PathBuf),
    /// An external command failed to start or exited non-zero.
    #[error(transparent)]
    Process(#[from] process::ProcessError),
    /// A generated file could not be rewritten.
    #[error(transparent)]
    Rewrite(#[from] rewrite::RewriteError),
    /// The coverage report could not be read.
    #[error(transparent)]
    Coverage(#[from] coverage::CoverageError),
    /// Coverage is below the configured threshold.
    #[error("Coverage {actual}% is less than required {required}%")]
    Threshold {
        /// Required percentage.
        required: f64,
        /// Measured percentage.
        actual: f64,
    },
    /// A report artifact could not be written.
    #[error("Failed to write report {path}: {source}")]
    Report {
        /// Report file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Process exit status for this failure.
    ///
    /// External command failures propagate the command's own status.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Process(e) => e.exit_code(),
            PipelineError::Coverage(_) => COVERAGE_PARSE_EXIT_CODE,
            _ => FAILURE_EXIT_CODE,
        }
    }
}

// Module declarations
pub mod docs;
pub mod orchestration;
pub mod test_orchestration;
pub mod viewer;

// Re-export public API
pub use docs::{build_proto_docs, project_name};
pub use orchestration::{generate, rewrite_python_imports, TargetOutcome};
pub use test_orchestration::{filter_packages, run_test_gate};
pub use viewer::{default_viewer, open_docs, open_reports};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let failed = PipelineError::Process(process::ProcessError::Failed {
            program: "go".to_string(),
            status: 3,
        });
        assert_eq!(failed.exit_code(), 3);

        let threshold = PipelineError::Threshold { required: 80.0, actual: 10.0 };
        assert_eq!(threshold.exit_code(), FAILURE_EXIT_CODE);
        assert_eq!(threshold.to_string(), "Coverage 10% is less than required 80%");

        let parse = PipelineError::Coverage(coverage::CoverageError::MissingSummary);
        assert_eq!(parse.exit_code(), COVERAGE_PARSE_EXIT_CODE);
        assert_ne!(parse.exit_code(), threshold.exit_code());

        let config = PipelineError::Config(config::ConfigError::MissingKey {
            section: "proto",
            key: "source_root",
        });
        assert_eq!(config.exit_code(), FAILURE_EXIT_CODE);
    }
}

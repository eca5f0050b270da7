#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command-line front end for Protobridge.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use config::Options;
use pipeline::PipelineError;
use process::CommandRunner;
use thiserror::Error;
use tracing::info;
use types::Target;

/// Errors surfaced by the binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// A pipeline step failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pipeline(e) => e.exit_code(),
            _ => pipeline::FAILURE_EXIT_CODE,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Generate Go and Python protobuf bindings and gate Go test coverage.
#[derive(Parser, Debug)]
#[command(name = "protobridge", version, about)]
pub struct Cli {
    /// Configuration file (default: nearest protobridge.toml above the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile schema files into bindings (all targets when none given)
    Generate {
        /// Target runtime; repeatable
        #[arg(long = "target", value_parser = clap::value_parser!(Target))]
        targets: Vec<Target>,
    },
    /// Relocate imports in the generated Python tree
    Rewrite,
    /// Run Go tests with coverage and enforce the threshold
    Test,
    /// Render HTML documentation for the schema files
    Docs,
    /// Open HTML output in a browser
    Open {
        /// What to open
        #[arg(value_enum)]
        what: OpenTarget,
    },
    /// Print the project name
    Name,
}

/// Things `open` can show.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenTarget {
    /// Coverage and test-result reports
    Reports,
    /// Documentation index
    Docs,
}

/// Load the configuration selected by `--config`, or discover it.
pub fn load_options(cli: &Cli) -> Result<Options> {
    let options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::discover()?,
    };
    Ok(options)
}

/// Run `command` against `options`.
pub fn execute(command: &Commands, options: &Options, runner: &dyn CommandRunner) -> Result<()> {
    match command {
        Commands::Generate { targets } => {
            for outcome in pipeline::generate(options, runner, targets)? {
                info!(runtime = %outcome.target, sources = outcome.sources, "generated");
                if let Some(summary) = outcome.rewrite {
                    info!(
                        primary = summary.primary_files,
                        stubs = summary.stub_files,
                        changed = summary.changed_files,
                        "relocated python imports"
                    );
                }
            }
        }
        Commands::Rewrite => {
            let summary = pipeline::rewrite_python_imports(options)?;
            info!(visited = summary.visited(), changed = summary.changed_files, "rewrite complete");
        }
        Commands::Test => {
            let report = pipeline::run_test_gate(options, runner)?;
            eprintln!("{}", report);
        }
        Commands::Docs => pipeline::build_proto_docs(options, runner)?,
        Commands::Open { what: OpenTarget::Reports } => pipeline::open_reports(options, runner)?,
        Commands::Open { what: OpenTarget::Docs } => pipeline::open_docs(options, runner)?,
        Commands::Name => {
            let mut stdout = io::stdout();
            write!(stdout, "{}", pipeline::project_name(options)?)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

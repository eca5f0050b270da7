#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `protobridge-process`: external command execution
//!
//! Every external tool Protobridge drives (schema compiler, test runner,
//! coverage reporter, viewer) is launched through the [`CommandRunner`]
//! trait. Commands run one at a time and are always waited on; there is no
//! internal timeout or watchdog.
//!
//! ## Modes
//!
//! * [`CommandRunner::run`] streams the child's stdio straight through and
//!   fails with [`ProcessError::Failed`] on a non-zero status.
//! * [`CommandRunner::capture`] buffers stdout and stderr into a
//!   [`RunResult`]. The status is returned as-is; the caller decides what a
//!   non-zero status means.
//!
//! [`SystemRunner`] is the real implementation. With the `test-utils`
//! feature, [`testing::ScriptedRunner`] records invocations and replays
//! canned results instead of spawning anything.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::info;
use types::{CommandSpec, RunResult};

/// Exit status reported when a program cannot be started at all.
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// Type alias for process results.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Failures of an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (missing binary, permissions).
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        /// Program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The program ran and exited with a non-zero status.
    #[error("`{program}` exited with status {status}")]
    Failed {
        /// Program that failed.
        program: String,
        /// Its exit status.
        status: i32,
    },
}

impl ProcessError {
    /// The exit status this failure should be propagated as.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::Spawn { .. } => SPAWN_FAILURE_STATUS,
            ProcessError::Failed { status, .. } => *status,
        }
    }
}

/// Executes external commands.
pub trait CommandRunner {
    /// Run `spec` in `cwd`, letting it write directly to our stdout/stderr.
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<()>;

    /// Run `spec` in `cwd`, buffering both output streams.
    fn capture(&self, spec: &CommandSpec, cwd: &Path) -> Result<RunResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec, cwd: &Path) -> Command {
        let mut cmd = Command::new(spec.program());
        cmd.args(spec.arguments()).current_dir(cwd);
        cmd
    }

    fn spawn_error(spec: &CommandSpec, source: io::Error) -> ProcessError {
        ProcessError::Spawn { program: spec.program().to_string(), source }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<()> {
        info!("command: {}", spec);
        let status = Self::command(spec, cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Self::spawn_error(spec, e))?;

        match status.code() {
            Some(0) => Ok(()),
            code => Err(ProcessError::Failed {
                program: spec.program().to_string(),
                status: code.unwrap_or(1),
            }),
        }
    }

    fn capture(&self, spec: &CommandSpec, cwd: &Path) -> Result<RunResult> {
        info!("command: {}", spec);
        let output = Self::command(spec, cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_error(spec, e))?;

        Ok(RunResult::new(
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
            output.status.code().unwrap_or(1),
        ))
    }
}

/// Test doubles for code that drives a [`CommandRunner`].
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};

    use types::{CommandSpec, RunResult};

    use super::{CommandRunner, ProcessError, Result};

    /// How a recorded command was launched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Mode {
        /// Through [`CommandRunner::run`].
        Run,
        /// Through [`CommandRunner::capture`].
        Capture,
    }

    /// One recorded invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Invocation {
        /// The command as built.
        pub spec: CommandSpec,
        /// Working directory it was launched in.
        pub cwd: PathBuf,
        /// Launch mode.
        pub mode: Mode,
    }

    /// Records every command and answers with queued results.
    ///
    /// Once the queue is empty every command succeeds with empty output.
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        responses: RefCell<VecDeque<RunResult>>,
        invocations: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        /// A runner where every command succeeds silently.
        pub fn new() -> Self { Self::default() }

        /// Queue the result for the next command.
        pub fn respond(self, result: RunResult) -> Self {
            self.responses.borrow_mut().push_back(result);
            self
        }

        /// Everything launched so far, in order.
        pub fn invocations(&self) -> Vec<Invocation> { self.invocations.borrow().clone() }

        /// Just the command vectors, in order.
        pub fn specs(&self) -> Vec<CommandSpec> {
            self.invocations.borrow().iter().map(|i| i.spec.clone()).collect()
        }

        fn next(&self, spec: &CommandSpec, cwd: &Path, mode: Mode) -> RunResult {
            self.invocations.borrow_mut().push(Invocation {
                spec: spec.clone(),
                cwd: cwd.to_path_buf(),
                mode,
            });
            self.responses.borrow_mut().pop_front().unwrap_or_default()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<()> {
            let result = self.next(spec, cwd, Mode::Run);
            if result.success() {
                Ok(())
            } else {
                Err(ProcessError::Failed {
                    program: spec.program().to_string(),
                    status: result.status,
                })
            }
        }

        fn capture(&self, spec: &CommandSpec, cwd: &Path) -> Result<RunResult> {
            Ok(self.next(spec, cwd, Mode::Capture))
        }
    }
}

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Core types shared by every Protobridge stage.
//!
//! Nothing in this crate performs I/O. The types describe what the pipeline
//! works on (schema sources, generated artifacts), what it hands to external
//! tools (command vectors) and what it gets back (captured runs).

/// Target runtimes that bindings are generated for.
pub mod target;
/// Discovered schema sources and compiler-produced artifacts.
pub mod files;
/// Argument vectors for external tool invocations.
pub mod command;
/// Captured output of a finished external process.
pub mod run;

pub use command::CommandSpec;
pub use files::{FileKind, GeneratedFile, SourceFile};
pub use run::RunResult;
pub use target::Target;

// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Path utilities for Protobridge.
//!
//! This crate locates the project root, normalizes paths into the
//! project-relative form external tools expect, and discovers schema sources
//! and generated artifacts below a directory.

pub mod discovery;
pub mod path_utils;

pub use discovery::{find_files_with_extension, DiscoveryError, SourceDiscovery};
// Re-export for convenience
pub use path_utils::*;

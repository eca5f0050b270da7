// SPDX-License-Identifier: CC0-1.0

//! Recursive discovery of schema sources and generated files.
//!
//! Walks are sorted by file name so command lines stay reproducible between
//! runs. Correctness never depends on that order.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use types::SourceFile;
use walkdir::WalkDir;

use crate::path_utils::normalize_relative;

/// Errors raised while locating files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The directory to search does not exist.
    #[error("Directory not found: {0}")]
    MissingRoot(PathBuf),
    /// A directory below the root could not be read.
    #[error("Failed to read {path}: {source}")]
    Walk {
        /// Entry that failed.
        path: PathBuf,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },
    /// No ancestor directory holds the project marker file.
    #[error("Could not find project root (no {0} in this or any parent directory)")]
    ProjectRootNotFound(String),
    /// Failed to read the current directory.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Finds schema files below a source root.
///
/// ```no_run
/// use protobridge_path::SourceDiscovery;
///
/// let files = SourceDiscovery::new("/repo", "/repo/astral_proto")
///     .exclude(Some("google"))
///     .discover()
///     .expect("discovery failed");
/// for file in files {
///     println!("{}", file.relative);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SourceDiscovery {
    project_root: PathBuf,
    source_root: PathBuf,
    extension: String,
    exclude: Option<String>,
}

impl SourceDiscovery {
    /// Default schema extension.
    pub const PROTO_EXTENSION: &'static str = "proto";

    /// Discover `*.proto` files under `source_root`, normalized against `project_root`.
    pub fn new(project_root: impl Into<PathBuf>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            source_root: source_root.into(),
            extension: Self::PROTO_EXTENSION.to_string(),
            exclude: None,
        }
    }

    /// Match a different schema extension (without the dot).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Skip every file whose normalized path contains `marker`.
    pub fn exclude(mut self, marker: Option<&str>) -> Self {
        self.exclude = marker.filter(|m| !m.is_empty()).map(str::to_string);
        self
    }

    /// Walk the source root and return every matching file.
    pub fn discover(&self) -> Result<Vec<SourceFile>, DiscoveryError> {
        let mut found = Vec::new();
        for path in find_files_with_extension(&self.source_root, &self.extension)? {
            let relative = normalize_relative(&path, &self.project_root);
            if let Some(marker) = &self.exclude {
                if relative.contains(marker.as_str()) {
                    debug!(file = %relative, marker = %marker, "excluded from discovery");
                    continue;
                }
            }
            found.push(SourceFile::new(path, relative));
        }
        debug!(root = %self.source_root.display(), count = found.len(), "discovered schema sources");
        Ok(found)
    }
}

/// Recursively list regular files under `dir` whose extension is exactly `extension`.
pub fn find_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingRoot(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: source.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

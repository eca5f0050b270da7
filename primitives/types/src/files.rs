//! Files flowing through the pipeline.

use std::fmt;
use std::path::PathBuf;

/// A schema source found during discovery.
///
/// `relative` is the string handed to the schema compiler: the path relative
/// to the project root, prefixed with `./` (for example `./api/v1/user.proto`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceFile {
    /// Absolute (or root-joined) location on disk.
    pub path: PathBuf,
    /// Normalized project-relative path.
    pub relative: String,
}

impl SourceFile {
    /// Create a source file entry.
    pub fn new(path: impl Into<PathBuf>, relative: impl Into<String>) -> Self {
        Self { path: path.into(), relative: relative.into() }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.relative) }
}

/// Which flavour of generated artifact a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Main binding source (`*.py`).
    Primary,
    /// Type-declaration companion (`*.pyi`).
    Stub,
}

impl FileKind {
    /// File extension (without the dot) that identifies this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Primary => "py",
            FileKind::Stub => "pyi",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Primary => f.write_str("primary"),
            FileKind::Stub => f.write_str("stub"),
        }
    }
}

/// A compiler-produced file awaiting import relocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Primary or stub.
    pub kind: FileKind,
}

impl GeneratedFile {
    /// Create a generated-file entry.
    pub fn new(path: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self { path: path.into(), kind }
    }
}

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Import relocation for generated Python bindings.
//!
//! The Python generator writes imports as if the schema tree were a
//! top-level package (`from astral_proto.users import user_pb2`). The
//! bindings are shipped inside another package, so every such reference
//! is moved under the new prefix (`from astral_grpc.astral_proto.users ...`).
//!
//! Only four textual shapes are touched, so unrelated text that happens to
//! contain the prefix survives:
//!
//! | Rule | Before | After | Files |
//! |---|---|---|---|
//! | [`Rule::FromImport`] | `from old` | `from new` | all |
//! | [`Rule::Import`] | `import old` | `import new` | all |
//! | [`Rule::ListReference`] | `[old` | `[new` | primary only |
//! | [`Rule::QualifiedName`] | ` old.` | ` new.` | all |
//!
//! Each rule is a literal replacement over the whole text, applied in that
//! order. Text produced by an earlier rule never matches a later one, and a
//! second pass over rewritten text changes nothing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use types::{FileKind, GeneratedFile};

/// Errors raised while relocating imports. Any of them aborts the whole run.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A generated file could not be read.
    #[error("Failed to read generated file {path}: {source}")]
    Read {
        /// File being rewritten.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A generated file could not be written back.
    #[error("Failed to write generated file {path}: {source}")]
    Write {
        /// File being rewritten.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The generated tree could not be walked.
    #[error(transparent)]
    Discovery(#[from] path::DiscoveryError),
}

/// One textual shape an import reference can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `from <prefix>`
    FromImport,
    /// `import <prefix>`
    Import,
    /// `[<prefix>`; stub files use brackets for generics, so they are skipped.
    ListReference,
    /// ` <prefix>.` after whitespace.
    QualifiedName,
}

impl Rule {
    /// Rules in application order.
    pub const ORDERED: [Rule; 4] =
        [Rule::FromImport, Rule::Import, Rule::ListReference, Rule::QualifiedName];

    /// The literal text this rule matches (or produces) for `prefix`.
    pub fn pattern(&self, prefix: &str) -> String {
        match self {
            Rule::FromImport => format!("from {}", prefix),
            Rule::Import => format!("import {}", prefix),
            Rule::ListReference => format!("[{}", prefix),
            Rule::QualifiedName => format!(" {}.", prefix),
        }
    }

    /// Whether this rule runs on files of `kind`.
    pub fn applies_to(&self, kind: FileKind) -> bool {
        !(matches!(self, Rule::ListReference) && kind == FileKind::Stub)
    }
}

/// Counts from one pass over a generated tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Primary files visited.
    pub primary_files: usize,
    /// Stub files visited.
    pub stub_files: usize,
    /// Files whose content changed and were written back.
    pub changed_files: usize,
}

impl RewriteSummary {
    /// Every file visited, changed or not.
    pub fn visited(&self) -> usize { self.primary_files + self.stub_files }
}

/// Moves import references from one package prefix to another.
#[derive(Debug, Clone)]
pub struct ImportRewriter {
    replacements: Vec<(Rule, String, String)>,
}

impl ImportRewriter {
    /// Prepare the four replacements for `old_prefix` → `new_prefix`.
    pub fn new(old_prefix: &str, new_prefix: &str) -> Self {
        let replacements = Rule::ORDERED
            .iter()
            .map(|rule| (*rule, rule.pattern(old_prefix), rule.pattern(new_prefix)))
            .collect();
        Self { replacements }
    }

    /// Rewrite `text` as a file of `kind` would be rewritten.
    pub fn rewrite_text(&self, text: &str, kind: FileKind) -> String {
        let mut out = text.to_string();
        for (rule, from, to) in &self.replacements {
            if rule.applies_to(kind) && out.contains(from.as_str()) {
                out = out.replace(from.as_str(), to);
            }
        }
        out
    }

    /// Rewrite one file in place. Returns whether its content changed.
    ///
    /// The file is only written when something changed.
    pub fn rewrite_file(&self, file: &GeneratedFile) -> Result<bool, RewriteError> {
        let original = fs::read_to_string(&file.path)
            .map_err(|source| RewriteError::Read { path: file.path.clone(), source })?;
        let rewritten = self.rewrite_text(&original, file.kind);
        if rewritten == original {
            return Ok(false);
        }
        fs::write(&file.path, rewritten)
            .map_err(|source| RewriteError::Write { path: file.path.clone(), source })?;
        debug!(file = %file.path.display(), kind = %file.kind, "rewrote imports");
        Ok(true)
    }

    /// Rewrite every primary and stub file below `root`.
    ///
    /// All matching files are visited; the first I/O failure aborts.
    pub fn rewrite_tree(&self, root: &Path) -> Result<RewriteSummary, RewriteError> {
        let mut summary = RewriteSummary::default();
        for kind in [FileKind::Primary, FileKind::Stub] {
            for file in generated_files(root, kind)? {
                match kind {
                    FileKind::Primary => summary.primary_files += 1,
                    FileKind::Stub => summary.stub_files += 1,
                }
                if self.rewrite_file(&file)? {
                    summary.changed_files += 1;
                }
            }
        }
        info!(
            root = %root.display(),
            primary = summary.primary_files,
            stub = summary.stub_files,
            changed = summary.changed_files,
            "relocated generated imports"
        );
        Ok(summary)
    }
}

/// Every generated file of `kind` below `root`.
pub fn generated_files(root: &Path, kind: FileKind) -> Result<Vec<GeneratedFile>, RewriteError> {
    Ok(path::find_files_with_extension(root, kind.extension())?
        .into_iter()
        .map(|p| GeneratedFile::new(p, kind))
        .collect())
}

//! Binding generation.
//!
//! For each requested target: discover schema sources, run the schema
//! compiler over all of them, then apply the target's post-processing
//! (struct tag injection for Go, import relocation for Python).

use std::path::{Path, PathBuf};

use commands::CommandBuilder;
use config::Options;
use path::{find_files_with_extension, SourceDiscovery};
use process::CommandRunner;
use rewrite::{ImportRewriter, RewriteSummary};
use tracing::info;
use types::Target;

use crate::{PipelineError, Result};

/// What generation did for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    /// The target.
    pub target: Target,
    /// Number of schema files handed to the compiler.
    pub sources: usize,
    /// Go files that had tags injected.
    pub tagged_files: usize,
    /// Import relocation counts, for targets that need it.
    pub rewrite: Option<RewriteSummary>,
}

/// Generate bindings for `targets` (all targets when empty), in [`Target::ALL`] order.
pub fn generate(
    options: &Options,
    runner: &dyn CommandRunner,
    targets: &[Target],
) -> Result<Vec<TargetOutcome>> {
    let selected: Vec<Target> = Target::ALL
        .into_iter()
        .filter(|target| targets.is_empty() || targets.contains(target))
        .collect();

    let mut outcomes = Vec::with_capacity(selected.len());
    for target in selected {
        outcomes.push(generate_target(options, runner, target)?);
    }
    Ok(outcomes)
}

fn generate_target(
    options: &Options,
    runner: &dyn CommandRunner,
    target: Target,
) -> Result<TargetOutcome> {
    let source_root = options.resolve(&options.proto.source_root);
    let exclude = match target {
        Target::Go => options.go.exclude.as_deref(),
        Target::Python => options.python.exclude.as_deref(),
    };
    let sources = SourceDiscovery::new(&options.root, &source_root).exclude(exclude).discover()?;
    if sources.is_empty() {
        return Err(PipelineError::NoSources(source_root));
    }
    info!(runtime = %target, sources = sources.len(), "generating {} bindings", target.display_name());

    let spec = CommandBuilder::new(options).generate(target, &sources);
    runner.run(&spec, &options.root)?;

    let mut outcome =
        TargetOutcome { target, sources: sources.len(), tagged_files: 0, rewrite: None };
    if let (Target::Go, Some(tags_root)) = (target, &options.go.inject_tags_root) {
        outcome.tagged_files = inject_tags(options, runner, tags_root)?;
    }
    if target.requires_relocation() {
        outcome.rewrite = Some(rewrite_python_imports(options)?);
    }
    Ok(outcome)
}

/// Run the struct tag injector over every `*.pb.go` file below `tags_root`.
fn inject_tags(options: &Options, runner: &dyn CommandRunner, tags_root: &Path) -> Result<usize> {
    let files: Vec<PathBuf> = find_files_with_extension(&options.resolve(tags_root), "go")?
        .into_iter()
        .filter(|file| file.to_string_lossy().ends_with(".pb.go"))
        .collect();

    let builder = CommandBuilder::new(options);
    for file in &files {
        runner.run(&builder.inject_tags(file), &options.root)?;
    }
    info!(files = files.len(), "injected struct tags");
    Ok(files.len())
}

/// Relocate imports in the generated Python tree from the old prefix to the new one.
pub fn rewrite_python_imports(options: &Options) -> Result<RewriteSummary> {
    let python = &options.python;
    let rewriter = ImportRewriter::new(&python.old_prefix, &python.new_prefix);
    Ok(rewriter.rewrite_tree(&options.resolve(&python.rewrite_root))?)
}

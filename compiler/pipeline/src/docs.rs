//! Schema documentation and project metadata.

use commands::CommandBuilder;
use config::{ConfigError, Options};
use process::CommandRunner;

use crate::Result;

/// Render HTML documentation for the configured schema files.
pub fn build_proto_docs(options: &Options, runner: &dyn CommandRunner) -> Result<()> {
    if options.docs.proto_paths.is_empty() {
        return Err(ConfigError::MissingKey { section: "docs.proto", key: "paths" }.into());
    }
    runner.run(&CommandBuilder::new(options).proto_docs(), &options.root)?;
    Ok(())
}

/// `[metadata] name`.
pub fn project_name(options: &Options) -> Result<&str> {
    options
        .metadata
        .name
        .as_deref()
        .ok_or_else(|| ConfigError::MissingKey { section: "metadata", key: "name" }.into())
}

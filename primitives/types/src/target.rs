//! Type-safe names for the binding runtimes.

use std::fmt;
use std::str::FromStr;

/// A runtime the schema compiler generates bindings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Go bindings built through the `protoc` Go plugin.
    Go,
    /// Python bindings built through `grpc_tools.protoc`.
    Python,
}

impl Target {
    /// Every target, in the order the generator visits them.
    pub const ALL: [Target; 2] = [Target::Go, Target::Python];

    /// Get the string representation of the target name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Go => "go",
            Target::Python => "python",
        }
    }

    /// Get the human-readable display name for the target.
    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Go => "Go",
            Target::Python => "Python",
        }
    }

    /// Whether generated output must have its imports relocated afterwards.
    ///
    /// The Python generator assumes the schema tree is a top-level package;
    /// the output lives inside another package, so its imports are rewritten.
    pub fn requires_relocation(&self) -> bool { matches!(self, Target::Python) }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Target::Go),
            "python" | "py" => Ok(Target::Python),
            _ => Err(format!("Unknown target: {} (expected go or python)", s)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

//! Argument vectors for external processes.

use std::fmt;

/// An external process invocation: program name plus ordered arguments.
///
/// Built once by the command builder and consumed once by the runner. The
/// builder-style methods take `self` so a spec is complete before anyone
/// can observe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
}

impl CommandSpec {
    /// Start a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments, preserving their order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program to execute.
    pub fn program(&self) -> &str { &self.program }

    /// Arguments after the program name.
    pub fn arguments(&self) -> &[String] { &self.args }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)).collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.argv().join(" ")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let spec = CommandSpec::new("go").arg("test").args(["-v", "-failfast"]).arg("./...");
        assert_eq!(spec.program(), "go");
        assert_eq!(spec.arguments(), ["test", "-v", "-failfast", "./..."]);
        assert_eq!(spec.argv(), vec!["go", "test", "-v", "-failfast", "./..."]);
        assert_eq!(spec.to_string(), "go test -v -failfast ./...");
    }
}

//! Captured process results.

/// Buffered output and exit status of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Everything the process wrote to standard output.
    pub stdout: String,
    /// Everything the process wrote to standard error.
    pub stderr: String,
    /// Exit status. Processes killed by a signal report `1`.
    pub status: i32,
}

impl RunResult {
    /// Create a run result.
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, status: i32) -> Self {
        Self { stdout: stdout.into(), stderr: stderr.into(), status }
    }

    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool { self.status == 0 }

    /// Standard output followed by standard error.
    pub fn combined(&self) -> String {
        let mut full = String::with_capacity(self.stdout.len() + self.stderr.len());
        full.push_str(&self.stdout);
        full.push_str(&self.stderr);
        full
    }
}

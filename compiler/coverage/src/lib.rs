#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Coverage gate.
//!
//! Reads the human-readable summary printed by the coverage tool, takes the
//! **last** `total: (statements) N%` line (earlier ones belong to partial
//! reports) and compares it with the required threshold.
//!
//! A report without any summary line is an error in its own right: it must
//! never be mistaken for zero coverage.

use std::fmt;

use regex::Regex;
use thiserror::Error;

/// Pattern of the summary line; group 1 is the percentage.
pub const SUMMARY_PATTERN: &str = r"total:\s+\(statements\)\s+(\d+(?:\.\d+)?)%";

/// Failures to obtain a coverage figure.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The summary pattern failed to compile.
    #[error("Invalid coverage pattern: {0}")]
    Pattern(String),
    /// No summary line in the report.
    #[error("No `total: (statements) N%` line found in coverage report")]
    MissingSummary,
    /// The matched percentage is not a number.
    #[error("Unparsable coverage percentage `{0}`")]
    InvalidPercentage(String),
}

/// Extract the final total-statement coverage percentage from `report`.
pub fn parse_total(report: &str) -> Result<f64, CoverageError> {
    let re = Regex::new(SUMMARY_PATTERN).map_err(|e| CoverageError::Pattern(e.to_string()))?;
    let last = re
        .captures_iter(report)
        .filter_map(|caps| caps.get(1))
        .last()
        .ok_or(CoverageError::MissingSummary)?;
    last.as_str()
        .parse::<f64>()
        .map_err(|_| CoverageError::InvalidPercentage(last.as_str().to_string()))
}

/// Decimal places kept when converting a fraction to a percentage.
const PERCENT_PRECISION: f64 = 1e6;

/// Convert a threshold fraction (`0.56`) to the percentage coverage tools
/// report (`56.0`), dropping the binary rounding noise of the multiplication.
pub fn fraction_to_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * PERCENT_PRECISION).round() / PERCENT_PRECISION
}

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Coverage meets the threshold.
    Pass,
    /// Coverage is below the threshold.
    Fail,
}

/// Measured coverage next to the requirement, both in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageReport {
    /// Percentage reported by the tool.
    pub actual: f64,
    /// Required percentage.
    pub required: f64,
}

impl CoverageReport {
    /// Parse `report` and pair it with a threshold given as a fraction (`0.8` = 80%).
    pub fn evaluate(report: &str, threshold: f64) -> Result<Self, CoverageError> {
        Ok(Self { actual: parse_total(report)?, required: fraction_to_percent(threshold) })
    }

    /// Pass when the measured percentage is at least the required one.
    pub fn verdict(&self) -> Verdict {
        if self.actual >= self.required {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Whether the gate passes.
    pub fn passed(&self) -> bool { self.verdict() == Verdict::Pass }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict() {
            Verdict::Pass => write!(
                f,
                "Coverage {}% passes requirement of {}%",
                self.actual, self.required
            ),
            Verdict::Fail => write!(
                f,
                "Coverage {}% is less than required {}%",
                self.actual, self.required
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_total_accepts_integer_percentage() {
        assert_eq!(parse_total("total:\t(statements)\t100%").expect("parses"), 100.0);
    }

    #[test]
    fn test_report_display() {
        let pass = CoverageReport { actual: 82.5, required: 80.0 };
        assert_eq!(pass.to_string(), "Coverage 82.5% passes requirement of 80%");
        let fail = CoverageReport { actual: 10.0, required: 80.0 };
        assert_eq!(fail.to_string(), "Coverage 10% is less than required 80%");
    }
}

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for the Protobridge binary.
//!
//! Logs go to stderr; stdout carries echoed tool output. `RUST_LOG` wins
//! over the configured level.

use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor the configured level parses.
pub const FALLBACK_LEVEL: &str = "info";

/// Build the filter from `RUST_LOG`, then `level`, then [`FALLBACK_LEVEL`].
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

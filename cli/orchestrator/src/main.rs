//! `protobridge` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use clap::Parser;
use process::SystemRunner;
use protobridge_cli::{execute, load_options, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = load_options(&cli).and_then(|options| {
        logging::init(&options.logging.level);
        execute(&cli.command, &options, &SystemRunner)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

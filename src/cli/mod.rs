//! The suite-runner command-line interface.
//!
//! This module is the main entry point for the CLI and wires argument parsing
//! to the harness.

use std::process;

use clap::{error::ErrorKind, Parser};
use tracing::debug;

use crate::{
    diagnostics::Result,
    harness::{Harness, RunOutcome},
};

pub mod args;
pub mod output;

pub use args::RunnerArgs;
use output::ConsoleSink;

/// Exit code when any test program failed, or the run could not complete.
pub const FAILURE_EXIT_CODE: i32 = 1;
/// Exit code for a malformed command line.
pub const USAGE_EXIT_CODE: i32 = 2;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = match RunnerArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage problems go to stdout, like the rest of the runner's chatter.
            println!("{}", e.render());
            process::exit(USAGE_EXIT_CODE);
        }
    };

    match execute(&args) {
        Ok(outcome) if outcome.failed => process::exit(FAILURE_EXIT_CODE),
        Ok(_) => {}
        Err(e) => {
            debug!(error = ?e, "test run aborted");
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(FAILURE_EXIT_CODE);
        }
    }
}

/// Runs the suite described by `args`, reporting to the console.
pub fn execute(args: &RunnerArgs) -> Result<RunOutcome> {
    let config = args.to_config()?;
    let harness = Harness::new(config);
    let mut console = ConsoleSink::new();
    harness.run(&args.programs, &mut console)
}

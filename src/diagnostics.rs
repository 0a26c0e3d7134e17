//! Error type for the suite runner.
//!
//! Every fatal condition the harness can hit is a variant of [`HarnessError`].
//! A test program failing is *not* one of them: that is recorded in the run
//! outcome and reported in the summary. The variants here end the whole run.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Unified error type for all harness failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// The program is neither a `.py` script, a `.sh` script, nor executable.
    #[error("don't know what to do about {}", program.display())]
    #[diagnostic(
        code(suite_runner::config::unknown_program),
        help("test programs must end in .py or .sh, or have the executable bit set")
    )]
    UnknownProgramKind { program: PathBuf },

    #[error("failed to open log file {}", path.display())]
    #[diagnostic(code(suite_runner::log::open))]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read log file {}", path.display())]
    #[diagnostic(code(suite_runner::log::read))]
    LogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to log file {}", path.display())]
    #[diagnostic(code(suite_runner::log::write))]
    LogWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run {program}")]
    #[diagnostic(
        code(suite_runner::process::spawn),
        help("check that the interpreter or shell is on PATH and the program exists")
    )]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve the absolute path of {}", program.display())]
    #[diagnostic(code(suite_runner::config::resolve_program))]
    ResolveProgram {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve the current directory")]
    #[diagnostic(code(suite_runner::config::current_dir))]
    CurrentDir {
        #[source]
        source: io::Error,
    },
}

//! Sequential driver for external test programs.
//!
//! Each program runs to completion with its combined output appended to a
//! single log file, bracketed by `START:`/`END:` markers. Afterwards the log
//! is scanned for the `PASS:`, `FAIL:`, `XFAIL:` and `XPASS:` lines the
//! programs print themselves.

pub use crate::diagnostics::{HarnessError, Result};
pub use crate::harness::{Harness, HarnessConfig, ProgressSink, RunOutcome};
pub use crate::program::{Platform, ProgramKind, TestProgram};
pub use crate::summary::{Marker, Tally};

pub mod cli;
pub mod diagnostics;
pub mod harness;
pub mod log;
pub mod process;
pub mod program;
pub mod summary;

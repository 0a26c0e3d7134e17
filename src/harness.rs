//! The harness: runs test programs in order and summarizes the shared log.
//!
//! # Lifecycle of a run
//!
//! 1. The log file is truncated and held open for the whole run.
//! 2. Each program is classified, bracketed by `START:`/`END:` markers, and
//!    run to completion with its output going to the log.
//! 3. The log is closed, read back, and scanned into a [`Tally`].
//!
//! Progress and the final summary go through a [`ProgressSink`], so the
//! console front end and tests can observe the same run.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::diagnostics::Result;
use crate::log::TestLog;
use crate::process;
use crate::program::{Platform, TestProgram};
use crate::summary::Tally;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Immutable harness configuration. Building one performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Interpreter for `.py` programs.
    pub interpreter: String,
    /// Shell for `.sh` programs.
    pub shell: String,
    pub log_file: PathBuf,
    /// Forwarded to interpreted programs as `--url <base_url>`.
    pub base_url: Option<String>,
}

impl HarnessConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        interpreter: impl Into<String>,
        shell: impl Into<String>,
        log_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            interpreter: interpreter.into(),
            shell: shell.into(),
            log_file: log_file.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

// ============================================================================
// PROGRESS REPORTING
// ============================================================================

/// Receives progress and summary events from a run.
pub trait ProgressSink {
    /// A test is about to start. Implementations writing to a terminal should
    /// flush here, since the child's output bypasses them.
    fn test_started(&mut self, name: &str);
    /// A test finished; `failed` mirrors the child's exit status.
    fn test_finished(&mut self, name: &str, failed: bool);
    /// The log has been scanned.
    fn summary(&mut self, log_file: &Path, tally: &Tally);
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// True if any program exited unsuccessfully.
    pub failed: bool,
    pub tally: Tally,
}

// ============================================================================
// HARNESS
// ============================================================================

#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    platform: Platform,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            platform: Platform::current(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every program in `programs`, in order, then summarizes the log.
    ///
    /// A failing program does not stop the run. Any `Err` is fatal: an
    /// unclassifiable program, log I/O, or a child that could not be spawned.
    pub fn run<P, S>(&self, programs: &[P], sink: &mut S) -> Result<RunOutcome>
    where
        P: AsRef<Path>,
        S: ProgressSink + ?Sized,
    {
        let log_file = &self.config.log_file;
        info!(programs = programs.len(), log = %log_file.display(), "starting test run");

        let mut failed = false;
        {
            let mut log = TestLog::create(log_file)?;
            for program in programs {
                failed = self.run_test(program.as_ref(), &mut log, sink)? || failed;
            }
        }

        let tally = Tally::scan(&TestLog::read_to_string(log_file)?);
        debug!(
            passed = tally.passed.len(),
            failed = tally.failed.len(),
            xfailed = tally.xfailed.len(),
            xpassed = tally.xpassed.len(),
            "scanned test log"
        );
        sink.summary(log_file, &tally);

        Ok(RunOutcome { failed, tally })
    }

    /// Runs a single program, returning true if it failed.
    fn run_test<S>(&self, path: &Path, log: &mut TestLog, sink: &mut S) -> Result<bool>
    where
        S: ProgressSink + ?Sized,
    {
        let program = TestProgram::classify(path)?;
        let command = program.command_line(&self.config);
        debug!(
            program = %program.path.display(),
            kind = ?program.kind,
            command = %command.render(self.platform),
            "classified test program"
        );

        sink.test_started(&program.name);
        log.write_start(&program.name)?;
        let status = match process::run_program(&command, &program.dir, log, self.platform) {
            Ok(status) => status,
            Err(spawn_error) => {
                // The spawn error is what gets reported; a failed END write must not replace it.
                if let Err(write_error) = log.write_end(&program.name) {
                    debug!(error = %write_error, "could not close marker pair after spawn failure");
                }
                sink.test_finished(&program.name, true);
                return Err(spawn_error);
            }
        };
        log.write_end(&program.name)?;

        let failed = !status.success();
        if failed {
            info!(program = %program.name, %status, "test program failed");
        }
        sink.test_finished(&program.name, failed);
        Ok(failed)
    }
}

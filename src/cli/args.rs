//! Defines the command-line arguments for the suite runner.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::diagnostics::{HarnessError, Result};
use crate::harness::HarnessConfig;

/// Default log file name, resolved against the current directory.
pub const DEFAULT_LOG_FILE: &str = "tests.log";

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "suite-runner",
    version,
    about = "Run external test programs and summarize their PASS/FAIL output.",
    override_usage = "suite-runner <SOURCE_DIR> <BUILD_DIR> <INTERPRETER> <SHELL> [--url <BASE_URL>] [--log-file <LOG_FILE>] <PROGRAM>..."
)]
pub struct RunnerArgs {
    /// Base URL forwarded to `.py` tests as `--url <BASE_URL>`.
    #[arg(long = "url", value_name = "BASE_URL")]
    pub base_url: Option<String>,

    /// Where to write the combined test output.
    #[arg(long, env = "SUITE_RUNNER_LOG", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Top of the source tree.
    pub source_dir: PathBuf,

    /// Top of the build tree.
    pub build_dir: PathBuf,

    /// Interpreter used for `.py` test programs.
    pub interpreter: String,

    /// Shell used for `.sh` test programs.
    pub shell: String,

    /// Test programs to run, in order.
    #[arg(required = true, value_name = "PROGRAM")]
    pub programs: Vec<PathBuf>,
}

impl RunnerArgs {
    /// Builds the harness configuration, resolving paths against the current
    /// directory.
    pub fn to_config(&self) -> Result<HarnessConfig> {
        let config = HarnessConfig::new(
            absolute(&self.source_dir)?,
            absolute(&self.build_dir)?,
            self.interpreter.clone(),
            self.shell.clone(),
            absolute(&self.log_file)?,
        );
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| HarnessError::CurrentDir { source })
}

//! Handles all user-facing output for the CLI.
//!
//! Progress lines and the final summary go to stdout. Colors are only used
//! when stdout is a terminal.

// ============================================================================
// OUTPUT SINKS: ConsoleSink and OutputBuffer implementations
// ============================================================================

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::harness::ProgressSink;
use crate::summary::{SummaryReport, Tally};

/// ConsoleSink: writes progress and the summary to stdout.
pub struct ConsoleSink {
    stdout: StandardStream,
}

impl ConsoleSink {
    pub fn new() -> Self {
        let choice = if atty::is(atty::Stream::Stdout) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    fn write_status(&mut self, text: &str, color: Color) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stdout, "{text}");
        let _ = self.stdout.reset();
        let _ = writeln!(self.stdout);
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleSink {
    fn test_started(&mut self, name: &str) {
        let _ = write!(self.stdout, "{}", progress_line(name));
        let _ = self.stdout.flush();
    }

    fn test_finished(&mut self, _name: &str, failed: bool) {
        if failed {
            self.write_status(FAILURE, Color::Red);
        } else {
            self.write_status(SUCCESS, Color::Green);
        }
    }

    fn summary(&mut self, log_file: &Path, tally: &Tally) {
        let _ = write!(self.stdout, "{}", SummaryReport::new(log_file, tally));
        let _ = self.stdout.flush();
    }
}

/// OutputBuffer: collects the same text into a String for programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl ProgressSink for OutputBuffer {
    fn test_started(&mut self, name: &str) {
        self.buffer.push_str(&progress_line(name));
    }

    fn test_finished(&mut self, _name: &str, failed: bool) {
        self.buffer.push_str(if failed { FAILURE } else { SUCCESS });
        self.buffer.push('\n');
    }

    fn summary(&mut self, log_file: &Path, tally: &Tally) {
        self.buffer
            .push_str(&SummaryReport::new(log_file, tally).to_string());
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

const FAILURE: &str = "FAILURE";
const SUCCESS: &str = "success";

fn progress_line(name: &str) -> String {
    format!("Running all tests in {name}...")
}

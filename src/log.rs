//! The shared test log.
//!
//! The log is truncated when a run starts and every child appends to it
//! through a duplicated handle, so marker lines written here and child output
//! interleave in the order they happen. Writes go straight to the file
//! without buffering for the same reason.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::diagnostics::{HarnessError, Result};

/// Marker line written before a program runs.
pub const START_MARKER: &str = "START:";
/// Marker line written after a program runs.
pub const END_MARKER: &str = "END:";

/// An open, write-mode handle on the log file. Closed when dropped.
#[derive(Debug)]
pub struct TestLog {
    path: PathBuf,
    file: File,
}

impl TestLog {
    /// Opens `path` for writing, truncating anything from a previous run.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| HarnessError::LogOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `START: <name>`.
    pub fn write_start(&mut self, name: &str) -> Result<()> {
        self.write_line(&format!("{START_MARKER} {name}\n"))
    }

    /// Writes `END: <name>` followed by a blank line.
    pub fn write_end(&mut self, name: &str) -> Result<()> {
        self.write_line(&format!("{END_MARKER} {name}\n\n"))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush().map_err(|source| self.write_error(source))
    }

    /// Duplicated handles to hand a child as its stdout and stderr.
    pub fn child_stdio(&self) -> Result<(Stdio, Stdio)> {
        let stdout = self.file.try_clone().map_err(|source| self.write_error(source))?;
        let stderr = self.file.try_clone().map_err(|source| self.write_error(source))?;
        Ok((Stdio::from(stdout), Stdio::from(stderr)))
    }

    /// Reads a closed log back in full.
    pub fn read_to_string(path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|source| HarnessError::LogRead {
            path: path.to_path_buf(),
            source,
        })?;
        // Children may write anything; don't let one stray byte kill the summary.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: io::Error) -> HarnessError {
        HarnessError::LogWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_follow_line_convention() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.log");
        {
            let mut log = TestLog::create(&path).unwrap();
            log.write_start("a_test.py").unwrap();
            log.write_end("a_test.py").unwrap();
        }
        let text = TestLog::read_to_string(&path).unwrap();
        assert_eq!(text, "START: a_test.py\nEND: a_test.py\n\n");
    }

    #[test]
    fn create_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.log");
        fs::write(&path, "PASS: stale\n").unwrap();

        let log = TestLog::create(&path).unwrap();
        assert_eq!(log.path(), path);
        drop(log);

        assert_eq!(TestLog::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_directory_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("tests.log");
        let err = TestLog::create(&path).unwrap_err();
        assert!(matches!(err, HarnessError::LogOpen { .. }));
    }
}

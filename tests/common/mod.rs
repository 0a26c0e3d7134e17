//! # Shared fixtures for suite-runner integration tests
//!
//! Builds throwaway source/build trees populated with tiny shell-based test
//! programs. `.py` fixtures are shell scripts too; the tests configure `sh`
//! as the interpreter so no Python is needed.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A scratch workspace with `src/` and `build/` trees.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp workspace");
        fs::create_dir_all(root.path().join("src")).unwrap();
        fs::create_dir_all(root.path().join("build")).unwrap();
        Self { root }
    }

    pub fn src(&self) -> PathBuf {
        self.root.path().join("src")
    }

    pub fn build(&self) -> PathBuf {
        self.root.path().join("build")
    }

    pub fn log(&self) -> PathBuf {
        self.build().join("tests.log")
    }

    /// Writes a script under `src/<rel>` and makes sure `build/<dir of rel>`
    /// exists, mirroring a real out-of-tree build.
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.src().join(rel);
        write_file(&path, body);
        if let Some(parent) = Path::new(rel).parent() {
            fs::create_dir_all(self.build().join(parent)).unwrap();
        }
        path
    }

    /// Writes an executable under `build/<rel>`.
    #[cfg(unix)]
    pub fn executable(&self, rel: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.build().join(rel);
        write_file(&path, body);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}

fn write_file(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// Returns the `START:`/`END:` marker lines of a log, in order.
pub fn markers(log: &str) -> Vec<&str> {
    log.lines()
        .filter(|line| line.starts_with("START: ") || line.starts_with("END: "))
        .collect()
}

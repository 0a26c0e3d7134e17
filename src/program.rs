//! Test program classification and command-line construction.
//!
//! A test program is classified exactly once into a [`ProgramKind`] and then
//! carried as a [`TestProgram`] through execution. The argument list the child
//! receives depends only on that kind and the harness configuration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{HarnessError, Result};
use crate::harness::HarnessConfig;

// ============================================================================
// PLATFORM QUOTING
// ============================================================================

/// Target platform family, as far as argument quoting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Arguments are wrapped in double quotes to survive re-interpretation.
    Windows,
    /// Arguments are passed through unchanged.
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Formats a single argument for the given platform.
pub fn quote(arg: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows => format!("\"{arg}\""),
        Platform::Unix => arg.to_string(),
    }
}

// ============================================================================
// PROGRAM KINDS
// ============================================================================

/// How a test program gets launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramKind {
    /// `.py` scripts, run through the configured interpreter.
    Interpreted,
    /// `.sh` scripts, run through the configured shell.
    Shell,
    /// Anything else with the executable bit, run directly. Holds the
    /// absolute path used to spawn it.
    Executable { resolved: PathBuf },
}

/// A test program after classification.
#[derive(Debug, Clone)]
pub struct TestProgram {
    /// The path exactly as it was supplied.
    pub path: PathBuf,
    /// The directory the program lives in; the child runs there.
    pub dir: PathBuf,
    /// The file name, used for log markers and progress output.
    pub name: String,
    pub kind: ProgramKind,
}

impl TestProgram {
    /// Classifies `path` by its suffix, falling back to an executability check.
    ///
    /// Fails with [`HarnessError::UnknownProgramKind`] when the program is
    /// neither a known script type nor executable.
    pub fn classify(path: &Path) -> Result<Self> {
        let name = file_name(path);
        let kind = if name.ends_with(".py") {
            ProgramKind::Interpreted
        } else if name.ends_with(".sh") {
            ProgramKind::Shell
        } else if is_executable(path) {
            let resolved =
                std::path::absolute(path).map_err(|source| HarnessError::ResolveProgram {
                    program: path.to_path_buf(),
                    source,
                })?;
            ProgramKind::Executable { resolved }
        } else {
            return Err(HarnessError::UnknownProgramKind {
                program: path.to_path_buf(),
            });
        };

        Ok(Self::with_kind(path, kind))
    }

    pub(crate) fn with_kind(path: &Path, kind: ProgramKind) -> Self {
        Self {
            path: path.to_path_buf(),
            dir: program_dir(path),
            name: file_name(path),
            kind,
        }
    }

    /// Builds the argument list for this program under `config`.
    pub fn command_line(&self, config: &HarnessConfig) -> CommandLine {
        let relative_dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        match &self.kind {
            ProgramKind::Interpreted => {
                let mut argv = vec![
                    config.interpreter.clone(),
                    path_arg(&config.source_dir.join(&self.path)),
                ];
                if let Some(url) = &config.base_url {
                    argv.push("--url".to_string());
                    argv.push(url.clone());
                }
                CommandLine {
                    executable: PathBuf::from(&config.interpreter),
                    argv,
                }
            }
            ProgramKind::Shell => CommandLine {
                executable: PathBuf::from(&config.shell),
                argv: vec![
                    config.shell.clone(),
                    path_arg(&config.source_dir.join(&self.path)),
                    path_arg(&config.build_dir.join(relative_dir)),
                    path_arg(&config.source_dir.join(relative_dir)),
                ],
            },
            ProgramKind::Executable { resolved } => CommandLine {
                executable: resolved.clone(),
                argv: vec![format!("./{}", self.name)],
            },
        }
    }
}

// ============================================================================
// COMMAND LINES
// ============================================================================

/// A fully built child invocation.
///
/// `argv[0]` is the name the child sees for itself; `executable` is what
/// actually gets spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub executable: PathBuf,
    pub argv: Vec<String>,
}

impl CommandLine {
    /// The arguments after `argv[0]`.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Renders the whole argument list, quoted for `platform`.
    pub fn render(&self, platform: Platform) -> String {
        self.argv
            .iter()
            .map(|arg| quote(arg, platform))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn program_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

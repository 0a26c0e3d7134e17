//! Child process execution with output captured in the test log.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::diagnostics::{HarnessError, Result};
use crate::log::TestLog;
use crate::program::{CommandLine, Platform};

/// Runs `command` in `dir` and waits for it to exit.
///
/// The child's stdout and stderr both go to `log`. The harness's own
/// standard streams and working directory are left untouched.
pub fn run_program(
    command: &CommandLine,
    dir: &Path,
    log: &mut TestLog,
    platform: Platform,
) -> Result<ExitStatus> {
    // Pending console output must land before anything the child prints.
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    log.flush()?;

    let (stdout, stderr) = log.child_stdio()?;
    let mut cmd = build_command(command, platform);
    cmd.current_dir(dir).stdout(stdout).stderr(stderr);

    debug!(dir = %dir.display(), log = %log.path().display(), "spawning test program");
    let status = cmd.status().map_err(|source| HarnessError::Spawn {
        program: command.render(platform),
        source,
    })?;
    debug!(%status, "test program exited");
    Ok(status)
}

fn build_command(command: &CommandLine, platform: Platform) -> Command {
    let mut cmd = Command::new(&command.executable);
    set_arg0(&mut cmd, command);
    for arg in command.args() {
        push_arg(&mut cmd, arg, platform);
    }
    cmd
}

#[cfg(unix)]
fn set_arg0(cmd: &mut Command, command: &CommandLine) {
    use std::os::unix::process::CommandExt;

    if let Some(arg0) = command.argv.first() {
        cmd.arg0(arg0);
    }
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut Command, _command: &CommandLine) {}

#[cfg(windows)]
fn push_arg(cmd: &mut Command, arg: &str, platform: Platform) {
    use std::os::windows::process::CommandExt;

    match platform {
        Platform::Windows => {
            cmd.raw_arg(crate::program::quote(arg, platform));
        }
        Platform::Unix => {
            cmd.arg(arg);
        }
    }
}

#[cfg(not(windows))]
fn push_arg(cmd: &mut Command, arg: &str, _platform: Platform) {
    cmd.arg(arg);
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh(script: &str) -> CommandLine {
        CommandLine {
            executable: PathBuf::from("sh"),
            argv: vec!["sh".into(), "-c".into(), script.into()],
        }
    }

    #[test]
    fn child_output_and_errors_land_in_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.log");
        let mut log = TestLog::create(&path).unwrap();

        let status = run_program(
            &sh("echo 'PASS: out'; echo 'FAIL: err' >&2; exit 3"),
            dir.path(),
            &mut log,
            Platform::Unix,
        )
        .unwrap();
        drop(log);

        assert_eq!(status.code(), Some(3));
        let text = TestLog::read_to_string(&path).unwrap();
        assert!(text.contains("PASS: out\n"));
        assert!(text.contains("FAIL: err\n"));
    }

    #[test]
    fn child_runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("work");
        std::fs::create_dir(&work).unwrap();
        let path = dir.path().join("tests.log");
        let before = std::env::current_dir().unwrap();

        let mut log = TestLog::create(&path).unwrap();
        let status = run_program(&sh("touch marker"), &work, &mut log, Platform::Unix).unwrap();
        drop(log);

        assert!(status.success());
        assert!(work.join("marker").exists());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = TestLog::create(&dir.path().join("tests.log")).unwrap();
        let command = CommandLine {
            executable: PathBuf::from("/definitely/not/a/real/interpreter"),
            argv: vec!["interpreter".into()],
        };
        let err = run_program(&command, dir.path(), &mut log, Platform::Unix).unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }
}

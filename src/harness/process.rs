//! Process execution boundary
//!
//! The harness only needs one capability from the outside world: run a
//! program with a file as standard input and another file as standard
//! output, and report how it exited. [`ProcessRunner`] abstracts that so
//! tests can substitute a fake.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use super::config::CommandSpec;

/// Exit code used when the input or output file cannot be opened.
pub const REDIRECT_FAILURE: i32 = 1;
/// Exit code used when the program cannot be found.
pub const COMMAND_NOT_FOUND: i32 = 127;
/// Exit code used when the program exists but cannot be started.
pub const COMMAND_NOT_EXECUTABLE: i32 = 126;

/// How a program run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub code: i32,
}

impl RunStatus {
    pub const SUCCESS: RunStatus = RunStatus { code: 0 };

    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run a program as a filter between two files.
pub trait ProcessRunner {
    /// Run `command` with `stdin` as standard input, writing standard output
    /// to `stdout` (created or truncated). Blocks until the program exits.
    fn run(&self, command: &CommandSpec, stdin: &Path, stdout: &Path) -> RunStatus;
}

/// Runs programs on the host with `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandSpec, stdin: &Path, stdout: &Path) -> RunStatus {
        let input = match open_input(stdin) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(input = %stdin.display(), error = %e, "cannot open test input");
                return RunStatus::new(REDIRECT_FAILURE);
            }
        };

        let output = match File::create(stdout) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(output = %stdout.display(), error = %e, "cannot create output file");
                return RunStatus::new(REDIRECT_FAILURE);
            }
        };

        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::from(input))
            .stdout(Stdio::from(output))
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) => RunStatus::new(exit_code(status)),
            Err(e) => {
                let code = if e.kind() == io::ErrorKind::NotFound {
                    COMMAND_NOT_FOUND
                } else {
                    COMMAND_NOT_EXECUTABLE
                };
                tracing::warn!(command = %command, error = %e, code, "failed to start program");
                RunStatus::new(code)
            }
        }
    }
}

fn open_input(path: &Path) -> io::Result<File> {
    // Opening a directory read-only succeeds on Unix; reject it up front.
    if fs::metadata(path)?.is_dir() {
        return Err(io::Error::other("is a directory"));
    }
    File::open(path)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => COMMAND_NOT_EXECUTABLE,
    }
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(COMMAND_NOT_EXECUTABLE)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").with_args(["-c", script])
    }

    #[test]
    fn test_stdin_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "hello\n").unwrap();

        let status = SystemProcessRunner.run(&sh("cat"), &input, &output);
        assert!(status.success());
        assert_eq!(fs::read_to_string(&output).unwrap(), "hello\n");
    }

    #[test]
    fn test_exit_code_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "").unwrap();

        let status = SystemProcessRunner.run(&sh("exit 3"), &input, &dir.path().join("out.txt"));
        assert_eq!(status, RunStatus::new(3));
    }

    #[test]
    fn test_output_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "new\n").unwrap();
        fs::write(&output, "stale content that is longer\n").unwrap();

        SystemProcessRunner.run(&sh("cat"), &input, &output);
        assert_eq!(fs::read_to_string(&output).unwrap(), "new\n");
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "").unwrap();

        let cmd = CommandSpec::new(dir.path().join("does-not-exist"));
        let status = SystemProcessRunner.run(&cmd, &input, &dir.path().join("out.txt"));
        assert_eq!(status, RunStatus::new(COMMAND_NOT_FOUND));
    }

    #[test]
    fn test_directory_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let status = SystemProcessRunner.run(&sh("cat"), dir.path(), &dir.path().join("out.txt"));
        assert_eq!(status, RunStatus::new(REDIRECT_FAILURE));
    }

    #[test]
    fn test_signal_maps_above_128() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "").unwrap();

        let status = SystemProcessRunner.run(&sh("kill -9 $$"), &input, &dir.path().join("out.txt"));
        assert_eq!(status, RunStatus::new(128 + 9));
    }
}

//! Output comparison
//!
//! [`Differ`] compares the reference and candidate output files and streams a
//! human-readable difference to the console. Two implementations exist:
//!
//! - [`ExternalDiff`] shells out to a line-diff program (`diff` by default)
//! - [`BuiltinDiff`] compares in-process and prints the same normal-diff format
//!
//! Both report a [`DiffOutcome`], so "the tool could not run" is never confused
//! with "no differences".

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use similar::{DiffOp, TextDiff};

use super::config::CommandSpec;
use super::errors::HarnessError;

/// Result of comparing two output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    Identical,
    Different,
}

/// Compare two files, writing the differences to `out`.
pub trait Differ {
    fn diff(&self, expected: &Path, actual: &Path, out: &mut dyn Write) -> Result<DiffOutcome, HarnessError>;
}

/// Runs `<program> [args..] <expected> <actual>`.
///
/// Exit status 0 means identical and 1 means different, following POSIX
/// `diff`. Anything else is treated as a failure of the tool itself.
#[derive(Debug, Clone)]
pub struct ExternalDiff {
    command: CommandSpec,
}

impl ExternalDiff {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }

    fn tool_error(&self, reason: impl Into<String>, source: Option<io::Error>) -> HarnessError {
        HarnessError::DiffTool {
            program: self.command.to_string(),
            reason: reason.into(),
            source,
        }
    }
}

impl Differ for ExternalDiff {
    fn diff(&self, expected: &Path, actual: &Path, out: &mut dyn Write) -> Result<DiffOutcome, HarnessError> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(expected)
            .arg(actual)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.tool_error("could not start", Some(e)))?;

        // Forward output as the tool produces it.
        if let Some(mut stdout) = child.stdout.take() {
            if let Err(e) = io::copy(&mut stdout, out) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(HarnessError::io("<console>", e));
            }
        }

        let status = child
            .wait()
            .map_err(|e| self.tool_error("could not wait for exit", Some(e)))?;

        match status.code() {
            Some(0) => Ok(DiffOutcome::Identical),
            Some(1) => Ok(DiffOutcome::Different),
            Some(code) => Err(self.tool_error(format!("exited with {}", code), None)),
            None => Err(self.tool_error("terminated by signal", None)),
        }
    }
}

/// In-process line diff printing classic `diff` output (`1c1`, `< old`, `---`, `> new`).
///
/// Outputs are compared as raw bytes; lines need not be valid UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDiff;

impl BuiltinDiff {
    /// Render the normal-format diff of two texts. Empty when identical.
    pub fn render(expected: &str, actual: &str) -> String {
        String::from_utf8_lossy(&Self::render_bytes(expected.as_bytes(), actual.as_bytes())).into_owned()
    }

    /// Render the normal-format diff of two byte streams, split on `\n`.
    pub fn render_bytes(expected: &[u8], actual: &[u8]) -> Vec<u8> {
        let diff = TextDiff::from_lines(expected, actual);
        let old = diff.old_slices();
        let new = diff.new_slices();
        let mut rendered = Vec::new();

        for op in diff.ops() {
            match *op {
                DiffOp::Equal { .. } => {}
                DiffOp::Delete {
                    old_index,
                    old_len,
                    new_index,
                } => {
                    push_header(&mut rendered, format!("{}d{}", line_range(old_index, old_len), new_index));
                    push_lines(&mut rendered, b"< ", &old[old_index..old_index + old_len]);
                }
                DiffOp::Insert {
                    old_index,
                    new_index,
                    new_len,
                } => {
                    push_header(&mut rendered, format!("{}a{}", old_index, line_range(new_index, new_len)));
                    push_lines(&mut rendered, b"> ", &new[new_index..new_index + new_len]);
                }
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    push_header(
                        &mut rendered,
                        format!("{}c{}", line_range(old_index, old_len), line_range(new_index, new_len)),
                    );
                    push_lines(&mut rendered, b"< ", &old[old_index..old_index + old_len]);
                    rendered.extend_from_slice(b"---\n");
                    push_lines(&mut rendered, b"> ", &new[new_index..new_index + new_len]);
                }
            }
        }

        rendered
    }
}

impl Differ for BuiltinDiff {
    fn diff(&self, expected: &Path, actual: &Path, out: &mut dyn Write) -> Result<DiffOutcome, HarnessError> {
        let expected_bytes = fs::read(expected).map_err(|e| HarnessError::io(expected, e))?;
        let actual_bytes = fs::read(actual).map_err(|e| HarnessError::io(actual, e))?;

        if expected_bytes == actual_bytes {
            return Ok(DiffOutcome::Identical);
        }

        let rendered = Self::render_bytes(&expected_bytes, &actual_bytes);
        out.write_all(&rendered)
            .map_err(|e| HarnessError::io("<console>", e))?;

        Ok(DiffOutcome::Different)
    }
}

/// 1-based `start[,end]` for a 0-based index and length.
fn line_range(index: usize, len: usize) -> String {
    if len <= 1 {
        format!("{}", index + 1)
    } else {
        format!("{},{}", index + 1, index + len)
    }
}

fn push_header(rendered: &mut Vec<u8>, header: String) {
    rendered.extend_from_slice(header.as_bytes());
    rendered.push(b'\n');
}

fn push_lines(rendered: &mut Vec<u8>, prefix: &[u8], lines: &[&[u8]]) {
    for line in lines {
        rendered.extend_from_slice(prefix);
        match line.strip_suffix(b"\n") {
            Some(body) => {
                rendered.extend_from_slice(body);
                rendered.push(b'\n');
            }
            None => {
                rendered.extend_from_slice(line);
                rendered.extend_from_slice(b"\n\\ No newline at end of file\n");
            }
        }
    }
}

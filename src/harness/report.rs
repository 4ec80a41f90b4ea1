//! Console reporting
//!
//! The harness separates reporting from execution through the [`Reporter`]
//! trait. [`ConsoleReporter`] reproduces the plain-text banners operators
//! are used to; other formats can be added by implementing the trait.

use std::io::{self, Write};

use super::config::CommandSpec;
use super::diff::DiffOutcome;
use super::discovery::TestCase;
use super::process::RunStatus;

const RULE_WIDTH: usize = 61;

/// Receives per-case events from the harness, in order.
pub trait Reporter {
    /// Called once, after discovery.
    fn on_run_start(&mut self, _case_count: usize) -> io::Result<()> {
        Ok(())
    }

    /// Either program exited non-zero; no diff follows.
    fn on_case_failed(
        &mut self,
        case: &TestCase,
        reference: (&CommandSpec, RunStatus),
        candidate: (&CommandSpec, RunStatus),
    ) -> io::Result<()>;

    /// Both programs succeeded; the diff is about to be written.
    fn on_case_banner(&mut self, case: &TestCase) -> io::Result<()>;

    /// The diff for `case` has been written.
    fn on_case_diffed(&mut self, case: &TestCase, outcome: DiffOutcome) -> io::Result<()>;

    /// Stream that diff output is written to.
    fn diff_sink(&mut self) -> &mut dyn Write;
}

/// Plain-text reporter writing to any stream (stdout by default).
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_case_failed(
        &mut self,
        case: &TestCase,
        reference: (&CommandSpec, RunStatus),
        candidate: (&CommandSpec, RunStatus),
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "ERROR: {}: {} exited with {}, {} exited with {}",
            case.display_name(),
            reference.0,
            reference.1.code,
            candidate.0,
            candidate.1.code
        )?;
        self.out.flush()
    }

    fn on_case_banner(&mut self, case: &TestCase) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "FILE {}", case.display_name())?;
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn on_case_diffed(&mut self, _case: &TestCase, _outcome: DiffOutcome) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn diff_sink(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

//! Differential test harness
//!
//! For every top-level file in the test directory, in sorted order:
//!
//! 1. run the reference program, stdin = the file, stdout = `expected/<file>.out`
//! 2. run the candidate program, stdout = `results/<file>.out`
//! 3. if either exited non-zero, report a failure and move on
//! 4. otherwise print a banner and diff the two outputs
//!
//! Execution is sequential and blocking. A failing test case never stops the
//! run; only discovery, output-directory or diff-tool errors do.

pub mod config;
pub mod diff;
pub mod discovery;
pub mod errors;
pub mod process;
pub mod report;

use std::fs;
use std::path::Path;

use config::{DiffSelection, HarnessConfig};
use diff::{BuiltinDiff, DiffOutcome, Differ, ExternalDiff};
use discovery::{TestCase, discover_test_cases};
use errors::HarnessError;
use process::{ProcessRunner, RunStatus, SystemProcessRunner};
use report::Reporter;

/// What happened to one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub reference: RunStatus,
    pub candidate: RunStatus,
    /// `None` when either program failed and no diff was attempted
    pub diff: Option<DiffOutcome>,
}

impl CaseOutcome {
    pub fn failed(&self) -> bool {
        self.diff.is_none()
    }
}

/// Runs a reference and a candidate program over a directory of inputs.
pub struct Harness {
    config: HarnessConfig,
    runner: Box<dyn ProcessRunner>,
    differ: Box<dyn Differ>,
}

impl Harness {
    /// Harness using host processes and the configured diff backend.
    pub fn new(config: HarnessConfig) -> Self {
        let differ: Box<dyn Differ> = match &config.diff {
            DiffSelection::External(cmd) => Box::new(ExternalDiff::new(cmd.clone())),
            DiffSelection::Builtin => Box::new(BuiltinDiff),
        };
        Self {
            config,
            runner: Box::new(SystemProcessRunner),
            differ,
        }
    }

    /// Harness with injected process runner and differ.
    pub fn with_parts(config: HarnessConfig, runner: Box<dyn ProcessRunner>, differ: Box<dyn Differ>) -> Self {
        Self { config, runner, differ }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every test case, reporting as it goes.
    #[tracing::instrument(skip_all, fields(test_dir = %self.config.test_dir.display()))]
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<Vec<CaseOutcome>, HarnessError> {
        let cases = discover_test_cases(&self.config.test_dir)?;

        ensure_dir(&self.config.expected_dir)?;
        ensure_dir(&self.config.results_dir)?;

        reporter
            .on_run_start(cases.len())
            .map_err(|e| HarnessError::io("<console>", e))?;

        let mut outcomes = Vec::with_capacity(cases.len());
        for case in cases {
            outcomes.push(self.run_case(case, reporter)?);
        }

        let failed = outcomes.iter().filter(|o| o.failed()).count();
        tracing::debug!(total = outcomes.len(), failed, "run complete");
        Ok(outcomes)
    }

    fn run_case(&self, case: TestCase, reporter: &mut dyn Reporter) -> Result<CaseOutcome, HarnessError> {
        let console_err = |e: std::io::Error| HarnessError::io("<console>", e);
        let expected = case.output_in(&self.config.expected_dir);
        let actual = case.output_in(&self.config.results_dir);

        tracing::debug!(case = %case.display_name(), "running reference");
        let reference = self.runner.run(&self.config.reference, &case.path, &expected);

        tracing::debug!(case = %case.display_name(), "running candidate");
        let candidate = self.runner.run(&self.config.candidate, &case.path, &actual);

        if !reference.success() || !candidate.success() {
            reporter
                .on_case_failed(
                    &case,
                    (&self.config.reference, reference),
                    (&self.config.candidate, candidate),
                )
                .map_err(console_err)?;
            return Ok(CaseOutcome {
                case,
                reference,
                candidate,
                diff: None,
            });
        }

        reporter.on_case_banner(&case).map_err(console_err)?;
        let outcome = self.differ.diff(&expected, &actual, reporter.diff_sink())?;
        reporter.on_case_diffed(&case, outcome).map_err(console_err)?;

        Ok(CaseOutcome {
            case,
            reference,
            candidate,
            diff: Some(outcome),
        })
    }
}

/// Create `dir` (and parents). An existing directory is fine.
fn ensure_dir(dir: &Path) -> Result<(), HarnessError> {
    fs::create_dir_all(dir).map_err(|source| HarnessError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

//! Harness configuration
//!
//! The test directory comes from the command line. Everything else has a
//! fixed default that can be overridden through the environment:
//!
//! | Variable                | Default         |
//! |-------------------------|-----------------|
//! | `DIFFTEST_REFERENCE`    | `./sem_base.exe`|
//! | `DIFFTEST_CANDIDATE`    | `./csem`        |
//! | `DIFFTEST_DIFF`         | `diff`          |
//! | `DIFFTEST_EXPECTED_DIR` | `expected`      |
//! | `DIFFTEST_RESULTS_DIR`  | `results`       |
//!
//! Setting `DIFFTEST_DIFF=builtin` selects the in-process differ.

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_REFERENCE: &str = "./sem_base.exe";
pub const DEFAULT_CANDIDATE: &str = "./csem";
pub const DEFAULT_DIFF: &str = "diff";
pub const DEFAULT_EXPECTED_DIR: &str = "expected";
pub const DEFAULT_RESULTS_DIR: &str = "results";

pub const ENV_REFERENCE: &str = "DIFFTEST_REFERENCE";
pub const ENV_CANDIDATE: &str = "DIFFTEST_CANDIDATE";
pub const ENV_DIFF: &str = "DIFFTEST_DIFF";
pub const ENV_EXPECTED_DIR: &str = "DIFFTEST_EXPECTED_DIR";
pub const ENV_RESULTS_DIR: &str = "DIFFTEST_RESULTS_DIR";

/// Value of `DIFFTEST_DIFF` that selects [`DiffSelection::Builtin`].
pub const BUILTIN_DIFF: &str = "builtin";

/// An external program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Parse a whitespace-separated command line. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program).with_args(words))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Which comparison backs the diff step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSelection {
    /// Shell out to a line-diff program (`diff <expected> <actual>`)
    External(CommandSpec),
    /// Compare in-process and print normal-diff output
    Builtin,
}

/// Everything a harness run needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory whose top-level entries are the test cases
    pub test_dir: PathBuf,
    /// Where reference outputs are written
    pub expected_dir: PathBuf,
    /// Where candidate outputs are written
    pub results_dir: PathBuf,
    pub reference: CommandSpec,
    pub candidate: CommandSpec,
    pub diff: DiffSelection,
}

impl HarnessConfig {
    /// Configuration with all defaults for the given test directory.
    pub fn new(test_dir: impl Into<PathBuf>) -> Self {
        Self {
            test_dir: test_dir.into(),
            expected_dir: PathBuf::from(DEFAULT_EXPECTED_DIR),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            reference: CommandSpec::new(DEFAULT_REFERENCE),
            candidate: CommandSpec::new(DEFAULT_CANDIDATE),
            diff: DiffSelection::External(CommandSpec::new(DEFAULT_DIFF)),
        }
    }

    /// Defaults overridden from the process environment.
    pub fn from_env(test_dir: impl Into<PathBuf>) -> Self {
        Self::from_env_with(test_dir, |key| env::var(key).ok())
    }

    /// Defaults overridden through `lookup`. Blank values are ignored.
    pub fn from_env_with<F>(test_dir: impl Into<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(test_dir);
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(cmd) = get(ENV_REFERENCE).as_deref().and_then(CommandSpec::parse) {
            config.reference = cmd;
        }
        if let Some(cmd) = get(ENV_CANDIDATE).as_deref().and_then(CommandSpec::parse) {
            config.candidate = cmd;
        }
        if let Some(value) = get(ENV_DIFF) {
            if value.trim() == BUILTIN_DIFF {
                config.diff = DiffSelection::Builtin;
            } else if let Some(cmd) = CommandSpec::parse(&value) {
                config.diff = DiffSelection::External(cmd);
            }
        }
        if let Some(dir) = get(ENV_EXPECTED_DIR) {
            config.expected_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_RESULTS_DIR) {
            config.results_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.expected_dir = root.join(DEFAULT_EXPECTED_DIR);
        self.results_dir = root.join(DEFAULT_RESULTS_DIR);
        self
    }

    pub fn with_reference(mut self, reference: CommandSpec) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_candidate(mut self, candidate: CommandSpec) -> Self {
        self.candidate = candidate;
        self
    }

    pub fn with_diff(mut self, diff: DiffSelection) -> Self {
        self.diff = diff;
        self
    }
}

#![forbid(unsafe_code)]
//! Differential Test Harness
//!
//! `difftest` walks a flat directory of input files and feeds each one, as standard input, to two programs: a
//! trusted *reference* and a *candidate* under test. Both outputs are captured to disk and compared line by line,
//! and any divergence is printed to the console under a per-file banner.
//!
//! ## Layout
//!
//! - [`cli`] - command-line surface and process exit handling
//! - [`harness`] - discovery, process execution, diffing and reporting
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod harness;

pub use harness::config::{CommandSpec, DiffSelection, HarnessConfig};
pub use harness::diff::{BuiltinDiff, DiffOutcome, Differ, ExternalDiff};
pub use harness::discovery::{TestCase, discover_test_cases};
pub use harness::errors::HarnessError;
pub use harness::process::{ProcessRunner, RunStatus, SystemProcessRunner};
pub use harness::report::{ConsoleReporter, Reporter};
pub use harness::{CaseOutcome, Harness};

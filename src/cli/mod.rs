//! CLI module for the difftest harness
//!
//! ## Usage
//!
//! ```text
//! difftest --test_dir <DIR>
//! difftest -d <DIR>
//! ```
//!
//! The reference/candidate programs and the diff tool are configured through
//! the environment (see [`crate::harness::config`]).
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! [`execute`] returns `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level [`run`] function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::harness::Harness;
use crate::harness::config::HarnessConfig;
use crate::harness::report::ConsoleReporter;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run a reference and a candidate program over every file in a directory and diff their outputs
#[derive(Parser, Debug)]
#[command(name = "difftest")]
#[command(version = VERSION)]
#[command(about = "Differential test harness", long_about = None)]
pub struct Cli {
    /// Absolute path to a flat directory of test case files
    #[arg(short = 'd', long = "test_dir", alias = "test-dir", value_name = "DIR")]
    pub test_dir: PathBuf,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Run the harness for the parsed command line.
///
/// Differences and per-case failures do not change the exit code; only a
/// fatal harness error does.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = HarnessConfig::from_env(cli.test_dir);
    tracing::info!(
        test_dir = %config.test_dir.display(),
        reference = %config.reference,
        candidate = %config.candidate,
        "starting run"
    );

    let harness = Harness::new(config);
    let mut reporter = ConsoleReporter::stdout();
    harness
        .run(&mut reporter)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================

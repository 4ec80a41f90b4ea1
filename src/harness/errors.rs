//! Harness error types

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a harness run.
///
/// Per-case execution failures (a program exiting non-zero, or failing to
/// launch) are not errors: they are reported and the run moves on.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to list test directory '{}': {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("diff tool '{program}' failed: {reason}{}", source.as_ref().map(|e| format!(": {}", e)).unwrap_or_default())]
    DiffTool {
        program: String,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

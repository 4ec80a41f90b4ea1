//! Test case discovery

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::HarnessError;

/// Suffix appended to a test case name to form its output file name.
pub const OUTPUT_SUFFIX: &str = ".out";

/// One input file, identified by its name within the test directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: OsString,
    pub path: PathBuf,
}

impl TestCase {
    pub fn new(dir: &Path, name: impl Into<OsString>) -> Self {
        let name = name.into();
        let path = dir.join(&name);
        Self { name, path }
    }

    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// `<name>.out`
    pub fn output_name(&self) -> OsString {
        let mut out = self.name.clone();
        out.push(OUTPUT_SUFFIX);
        out
    }

    pub fn output_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.output_name())
    }
}

/// List the top-level entries of `dir`, sorted by name.
///
/// Subdirectories are not filtered out: they become test cases whose
/// input cannot be opened, which surfaces later as a per-case failure.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover_test_cases(dir: &Path) -> Result<Vec<TestCase>, HarnessError> {
    let discovery_err = |source: std::io::Error| HarnessError::Discovery {
        path: dir.to_path_buf(),
        source,
    };

    let mut names: Vec<OsString> = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery_err)? {
        let entry = entry.map_err(discovery_err)?;
        names.push(entry.file_name());
    }
    names.sort();

    tracing::debug!(count = names.len(), "discovered test cases");
    Ok(names.into_iter().map(|name| TestCase::new(dir, name)).collect())
}

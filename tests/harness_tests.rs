//! End-to-end harness runs against real programs (shell scripts)
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use difftest::{
    CommandSpec, ConsoleReporter, DiffOutcome, DiffSelection, Harness, HarnessConfig, RunStatus,
};

const REFERENCE: &str = "cat > /dev/null\necho OK\n";

const CANDIDATE: &str = r#"input=$(cat)
case "$input" in
  *fail*) echo FAIL ;;
  *crash*) exit 2 ;;
  *) echo OK ;;
esac
"#;

struct Workspace {
    root: tempfile::TempDir,
}

impl Workspace {
    fn new(cases: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("tests")).unwrap();
        for (name, contents) in cases {
            fs::write(root.path().join("tests").join(name), contents).unwrap();
        }
        fs::write(root.path().join("reference.sh"), REFERENCE).unwrap();
        fs::write(root.path().join("candidate.sh"), CANDIDATE).unwrap();
        Self { root }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn script(&self, name: &str) -> CommandSpec {
        CommandSpec::new("sh").with_args([self.path().join(name).to_string_lossy().into_owned()])
    }

    fn config(&self, diff: DiffSelection) -> HarnessConfig {
        HarnessConfig::new(self.path().join("tests"))
            .with_output_root(self.path())
            .with_reference(self.script("reference.sh"))
            .with_candidate(self.script("candidate.sh"))
            .with_diff(diff)
    }

    fn run(&self, diff: DiffSelection) -> (Vec<difftest::CaseOutcome>, String) {
        let harness = Harness::new(self.config(diff));
        let mut reporter = ConsoleReporter::new(Vec::new());
        let outcomes = harness.run(&mut reporter).unwrap();
        (outcomes, String::from_utf8(reporter.into_inner()).unwrap())
    }

    fn output(&self, dir: &str, name: &str) -> String {
        fs::read_to_string(self.path().join(dir).join(name)).unwrap()
    }
}

fn diff_available() -> bool {
    Command::new("diff").arg("--version").output().is_ok()
}

#[test]
fn test_banners_follow_sorted_order() {
    let ws = Workspace::new(&[("b.txt", "b\n"), ("a.txt", "a\n")]);
    let (_, console) = ws.run(DiffSelection::Builtin);

    let a = console.find("FILE a.txt").unwrap();
    let b = console.find("FILE b.txt").unwrap();
    assert!(a < b);
    assert!(console.starts_with(&format!("{}\nFILE a.txt\n", "=".repeat(61))));
}

#[test]
fn test_outputs_are_captured() {
    let ws = Workspace::new(&[("x.txt", "please fail\n")]);
    ws.run(DiffSelection::Builtin);
    assert_eq!(ws.output("expected", "x.txt.out"), "OK\n");
    assert_eq!(ws.output("results", "x.txt.out"), "FAIL\n");
}

#[test]
fn test_changed_line_builtin() {
    let ws = Workspace::new(&[("x.txt", "please fail\n")]);
    let (outcomes, console) = ws.run(DiffSelection::Builtin);

    assert_eq!(outcomes[0].diff, Some(DiffOutcome::Different));
    assert!(console.contains("< OK\n---\n> FAIL\n"));
    assert!(!console.contains("ERROR"));
}

#[test]
fn test_changed_line_external_diff() {
    if !diff_available() {
        return; // Skip if no diff tool on the host
    }
    let ws = Workspace::new(&[("x.txt", "please fail\n")]);
    let (outcomes, console) = ws.run(DiffSelection::External(CommandSpec::new("diff")));

    assert_eq!(outcomes[0].diff, Some(DiffOutcome::Different));
    assert!(console.contains("< OK"));
    assert!(console.contains("> FAIL"));
    assert!(!console.contains("ERROR"));
}

#[test]
fn test_identical_outputs_external_diff() {
    if !diff_available() {
        return;
    }
    let ws = Workspace::new(&[("ok.txt", "fine\n")]);
    let (outcomes, console) = ws.run(DiffSelection::External(CommandSpec::new("diff")));

    assert_eq!(outcomes[0].diff, Some(DiffOutcome::Identical));
    assert!(!console.contains('<'));
    assert!(!console.contains('>'));
}

#[test]
fn test_candidate_exit_code_reported() {
    let ws = Workspace::new(&[("y.txt", "crash now\n"), ("z.txt", "fine\n")]);
    let (outcomes, console) = ws.run(DiffSelection::Builtin);

    assert_eq!(outcomes[0].candidate, RunStatus::new(2));
    assert_eq!(outcomes[0].diff, None);
    let error_line = console.lines().find(|l| l.starts_with("ERROR")).unwrap();
    assert!(error_line.contains("y.txt"));
    assert!(error_line.contains("exited with 0"));
    assert!(error_line.contains("exited with 2"));
    assert!(!console.contains("FILE y.txt"));

    assert_eq!(outcomes[1].diff, Some(DiffOutcome::Identical));
}

#[test]
fn test_subdirectory_entry_fails_per_case() {
    let ws = Workspace::new(&[("a.txt", "fine\n")]);
    fs::create_dir(ws.path().join("tests").join("stray")).unwrap();
    let (outcomes, console) = ws.run(DiffSelection::Builtin);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[1].failed());
    assert!(console.contains("ERROR: stray:"));
}

#[test]
fn test_missing_program_reported_as_127() {
    let ws = Workspace::new(&[("a.txt", "fine\n")]);
    let config = ws
        .config(DiffSelection::Builtin)
        .with_candidate(CommandSpec::new(ws.path().join("no-such-candidate")));
    let mut reporter = ConsoleReporter::new(Vec::new());
    let outcomes = Harness::new(config).run(&mut reporter).unwrap();

    assert_eq!(outcomes[0].candidate, RunStatus::new(127));
    assert!(outcomes[0].failed());
}

#[test]
fn test_rerun_overwrites_outputs() {
    let ws = Workspace::new(&[("x.txt", "please fail\n")]);
    ws.run(DiffSelection::Builtin);
    fs::write(ws.path().join("tests").join("x.txt"), "fine\n").unwrap();

    let (outcomes, _) = ws.run(DiffSelection::Builtin);
    assert_eq!(outcomes[0].diff, Some(DiffOutcome::Identical));
    assert_eq!(ws.output("results", "x.txt.out"), "OK\n");
}

#[test]
fn test_output_names_match_inputs() {
    let ws = Workspace::new(&[("one", "1\n"), ("two.in", "2\n"), ("three.txt", "3\n")]);
    ws.run(DiffSelection::Builtin);

    for dir in ["expected", "results"] {
        let mut names: Vec<String> = fs::read_dir(ws.path().join(dir))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["one.out", "three.txt.out", "two.in.out"]);
    }
}

// ============================================================================
// Binary
// ============================================================================

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_difftest"))
}

#[test]
fn test_binary_runs_from_working_directory() {
    let ws = Workspace::new(&[("x.txt", "please fail\n")]);
    let output = Command::new(binary())
        .arg("-d")
        .arg(ws.path().join("tests"))
        .current_dir(ws.path())
        .env("DIFFTEST_REFERENCE", format!("sh {}", ws.path().join("reference.sh").display()))
        .env("DIFFTEST_CANDIDATE", format!("sh {}", ws.path().join("candidate.sh").display()))
        .env("DIFFTEST_DIFF", "builtin")
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    // Differences do not change the exit status.
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("FILE x.txt"));
    assert!(stdout.contains("> FAIL"));
    assert!(ws.path().join("expected").join("x.txt.out").is_file());
    assert!(ws.path().join("results").join("x.txt.out").is_file());
}

#[test]
fn test_binary_requires_test_dir() {
    let ws = Workspace::new(&[]);
    let output = Command::new(binary()).current_dir(ws.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(!ws.path().join("expected").exists());
}

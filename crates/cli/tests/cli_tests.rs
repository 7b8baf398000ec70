//! Integration tests for the `ordo` CLI.
//!
//! These run the real binary against configuration files written to a
//! temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn ordo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ordo").unwrap();
    cmd.env_remove("ORDO_ENTRY_KEY").env_remove("ORDO_STRICT");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const PIPELINE_JSON: &str = r#"{
    "universe": "loader.fetch('AAPL')",
    "backtest": {
        "weights": "equalWeight(universe)",
        "returns": "weights.apply() * prices"
    },
    "main": "backtest.run()"
}"#;

const PIPELINE_YAML: &str = "\
rates: curve
model:
  calc: rates * 2
main: model.run()
";

#[test]
fn test_help_lists_subcommands() {
    ordo_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_dump_prints_every_task() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", PIPELINE_JSON);

    ordo_cmd()
        .arg("dump")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task(name='universe'"))
        .stdout(predicate::str::contains("Task(name='backtest.returns'"))
        .stdout(predicate::str::contains("object_dependencies=[\"backtest.weights\"]"))
        .stdout(predicate::str::contains("Entry point: Task(name='main'"));
}

#[test]
fn test_dump_reads_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.yaml", PIPELINE_YAML);

    ordo_cmd()
        .arg("dump")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Task(name='model.calc', type='leaf', formula='rates * 2'",
        ))
        .stdout(predicate::str::contains("dependencies=[\"rates\"]"));
}

#[test]
fn test_show_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", PIPELINE_JSON);

    ordo_cmd()
        .arg("show")
        .arg(&path)
        .arg("backtest.missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("task 'backtest.missing' not found"));
}

#[test]
fn test_show_known_task() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", PIPELINE_JSON);

    ordo_cmd()
        .arg("show")
        .arg(&path)
        .arg("backtest.weights")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependencies=[\"universe\"]"));
}

#[test]
fn test_entry_with_custom_key() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", r#"{"start": "1", "main": "2"}"#);

    ordo_cmd()
        .args(["--entry-key", "start", "entry"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Task(name='start'"));
}

#[test]
fn test_entry_missing_fails() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", r#"{"a": "1"}"#);

    ordo_cmd()
        .arg("entry")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no task is keyed 'main'"));
}

#[test]
fn test_validate_reports_unresolved() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", PIPELINE_JSON);

    ordo_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("backtest.returns: dependency 'prices'"))
        .stdout(predicate::str::contains("universe: object dependency 'loader'"));
}

#[test]
fn test_validate_strict_fails_on_unresolved() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", PIPELINE_JSON);

    ordo_cmd()
        .args(["validate", "--strict"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn test_validate_strict_passes_when_resolved() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", r#"{"a": "", "b": {"c": "a"}}"#);

    ordo_cmd()
        .args(["validate", "--strict"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All references resolved (3 tasks)."));
}

#[test]
fn test_non_mapping_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "pipeline.json", r#"["a", "b"]"#);

    ordo_cmd()
        .arg("dump")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration root must be a mapping"));
}

#[test]
fn test_missing_file_is_an_error() {
    ordo_cmd()
        .args(["dump", "/nonexistent/pipeline.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

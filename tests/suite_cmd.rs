use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

fn write_file(dir: &std::path::Path, name: &str, content: &str) {
    let mut f = fs::File::create(dir.join(name)).unwrap();
    write!(f, "{content}").unwrap();
}

#[test]
fn demo_suite_passes() {
    cargo_bin()
        .arg("test")
        .arg("--suite")
        .arg("demos/suite.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS hello.b"))
        .stdout(predicate::str::contains("PASS rot13.b"))
        .stdout(predicate::str::contains("3 total, 3 passed, 0 failed"));
}

#[test]
fn demo_suite_as_json_report() {
    cargo_bin()
        .arg("test")
        .arg("--suite")
        .arg("demos/suite.json")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"passed\": 3"))
        .stdout(predicate::str::contains("\"failed\": 0"));
}

#[test]
fn failing_case_sets_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "at.b", "++++++++[>++++++++<-]>.");
    write_file(
        dir.path(),
        "suite.json",
        r#"{"cases": [
            {"program": "at.b", "expected": "@"},
            {"program": "at.b", "expected": "X"}
        ]}"#,
    );

    cargo_bin()
        .arg("test")
        .arg("--suite")
        .arg(dir.path().join("suite.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PASS at.b"))
        .stdout(predicate::str::contains("FAIL at.b"))
        .stdout(predicate::str::contains("2 total, 1 passed, 1 failed"));
}

#[test]
fn missing_descriptor_is_reported() {
    cargo_bin()
        .arg("test")
        .arg("--suite")
        .arg("no/such/suite.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn malformed_descriptor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "suite.json", "{not json");

    cargo_bin()
        .arg("test")
        .arg("--suite")
        .arg(dir.path().join("suite.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed suite descriptor"));
}

#[test]
fn test_without_suite_prints_usage() {
    cargo_bin()
        .arg("test")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

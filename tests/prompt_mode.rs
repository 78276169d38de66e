use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

#[test]
fn piped_stdin_executes_the_program_once() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .write_stdin("+++.")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\u{3}"));
}

#[test]
fn forced_bare_mode_reads_stdin() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFI_MODE", "bare")
        .write_stdin("++++++++[>++++++++<-]>.")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@"));
}

#[test]
fn forced_editor_on_non_tty_errors() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFI_MODE", "editor")
        .write_stdin("+++.")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn invalid_mode_value_errors() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .env("BFI_MODE", "turbo")
        .write_stdin("+++.")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid BFI_MODE value"));
}

#[test]
fn pure_comment_submission_runs_nothing() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .write_stdin("no instructions here")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn help_flag_prints_usage() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage"));
}

//! Session durability tests for the liftlog binary.
//!
//! Every CLI invocation is a separate process, so consecutive invocations
//! against the same data directory exercise the restart-durability of the
//! session tracker for real.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("liftlog").expect("Failed to find liftlog binary");
    cmd.arg("--data-dir").arg(data_dir);
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"));
    cmd.env("HOME", data_dir);
    cmd
}

#[test]
fn test_active_workout_survives_restart() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").arg("Morning Push").assert().success();

    // A fresh process reloads the session pointer from disk
    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning Push"));
}

#[test]
fn test_minimize_resume_cycle_across_processes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").arg("Morning Push").assert().success();

    cli(data_dir)
        .arg("minimize")
        .assert()
        .success()
        .stdout(predicate::str::contains("minimized"));

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Minimized workout"))
        .stdout(predicate::str::contains("Morning Push"));

    cli(data_dir)
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resumed 'Morning Push'"));

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Minimized workout").not());
}

#[test]
fn test_minimize_saves_pending_edits() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").arg("Push").assert().success();

    cli(data_dir)
        .arg("minimize")
        .arg("--title")
        .arg("Push 2025")
        .arg("--notes")
        .arg("paused at the gym")
        .assert()
        .success();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push 2025"))
        .stdout(predicate::str::contains("paused at the gym"));
}

#[test]
fn test_finish_clears_session_durably() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").arg("Leg Day").assert().success();
    cli(data_dir).arg("add").arg("Squat").assert().success();
    cli(data_dir).arg("finish").assert().success();

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active workout."));

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Leg Day"));
}

#[test]
fn test_start_overwrites_previous_session_pointer() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").arg("First").assert().success();
    cli(data_dir).arg("add").arg("Squat").assert().success();

    cli(data_dir).arg("start").arg("Second").assert().success();

    // Only the new workout is tracked as current
    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Second"))
        .stdout(predicate::str::contains("First").not());
}

#[test]
fn test_resume_when_idle_reports_no_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("resume")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active workout"));
}

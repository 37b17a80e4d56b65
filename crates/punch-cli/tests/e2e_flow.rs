//! End-to-end integration tests for the complete timer tracking flow.
//!
//! Tests the full pipeline through the real binary: create → start → stop →
//! query, against a throwaway database selected via `PUNCH_DATABASE_PATH`.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn punch_binary() -> String {
    env!("CARGO_BIN_EXE_punch").to_string()
}

/// Runs the binary against an isolated database and home directory.
fn punch(temp: &Path, args: &[&str]) -> Output {
    Command::new(punch_binary())
        .env("HOME", temp)
        .env("PUNCH_DATABASE_PATH", temp.join("punch.db"))
        .args(args)
        .output()
        .expect("failed to run punch")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "punch should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_create_start_stop_flow() {
    let temp = TempDir::new().unwrap();

    let out = stdout_of(&punch(temp.path(), &["create", "Writing"]));
    assert_eq!(out, "Created timer 'Writing'\n");

    let out = stdout_of(&punch(temp.path(), &["start", "Writing"]));
    assert_eq!(out, "Started 'Writing'\n");

    let out = stdout_of(&punch(temp.path(), &["status"]));
    assert!(out.contains("Active timer: Writing"));
    assert!(out.contains("Status: running"));

    // Starting another timer implicitly stops the first
    let out = stdout_of(&punch(temp.path(), &["start", "Reading"]));
    assert_eq!(out, "Stopped 'Writing'\nStarted 'Reading'\n");

    let out = stdout_of(&punch(temp.path(), &["stop", "Reading"]));
    assert_eq!(out, "Stopped 'Reading'\n");

    let out = stdout_of(&punch(temp.path(), &["status"]));
    assert!(out.contains("Status: stopped"));
}

#[test]
fn test_list_orders_by_recency() {
    let temp = TempDir::new().unwrap();

    stdout_of(&punch(temp.path(), &["start", "First"]));
    stdout_of(&punch(temp.path(), &["start", "Second"]));

    let out = stdout_of(&punch(temp.path(), &["list"]));
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Second"));
    assert!(lines[1].contains("First"));
}

#[test]
fn test_active_timer_survives_restart() {
    let temp = TempDir::new().unwrap();

    stdout_of(&punch(temp.path(), &["start", "Writing"]));

    // A fresh process bootstraps from the trailing start mark
    let out = stdout_of(&punch(temp.path(), &["status"]));
    assert!(out.contains("Active timer: Writing"));
    assert!(out.contains("Status: running"));
}

#[test]
fn test_show_counts_marks() {
    let temp = TempDir::new().unwrap();

    stdout_of(&punch(temp.path(), &["start", "Writing"]));
    stdout_of(&punch(temp.path(), &["stop", "Writing"]));

    let out = stdout_of(&punch(temp.path(), &["show", "Writing"]));
    assert!(out.starts_with("Writing: "));
    assert!(out.contains("Marks: 2"));
    assert!(!out.contains("(running)"));
}

#[test]
fn test_report_json_covers_todays_marks() {
    let temp = TempDir::new().unwrap();

    stdout_of(&punch(temp.path(), &["start", "Writing"]));
    stdout_of(&punch(temp.path(), &["stop", "Writing"]));
    stdout_of(&punch(temp.path(), &["start", "Reading"]));
    stdout_of(&punch(temp.path(), &["stop", "Reading"]));

    let out = stdout_of(&punch(temp.path(), &["report", "--json"]));
    let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid JSON report");

    let days = parsed["days"].as_array().unwrap();
    assert_eq!(days.len(), 1);

    let titles: Vec<_> = days[0]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["title"].as_str().unwrap().to_owned())
        .collect();
    assert!(titles.contains(&"Writing".to_owned()));
    assert!(titles.contains(&"Reading".to_owned()));
}

#[test]
fn test_empty_title_is_rejected() {
    let temp = TempDir::new().unwrap();

    let output = punch(temp.path(), &["create", ""]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be empty"));
}

#[test]
fn test_stop_without_start_is_tolerated() {
    let temp = TempDir::new().unwrap();

    let out = stdout_of(&punch(temp.path(), &["stop", "Phantom"]));
    assert_eq!(out, "Stopped 'Phantom'\n");

    let out = stdout_of(&punch(temp.path(), &["show", "Phantom"]));
    assert!(out.contains("Marks: 1"));
}

//! End-to-end integration tests for the work log binary.
//!
//! Tests the full pipeline: staff → sessions/import → day view → report.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn wl_binary() -> String {
    env!("CARGO_BIN_EXE_wl").to_string()
}

/// Builds a command isolated to the temp directory.
fn wl(temp: &Path) -> Command {
    let mut cmd = Command::new(wl_binary());
    cmd.env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("WL_ADJACENCY_TOLERANCE_MINUTES")
        .env_remove("WL_DEFAULT_STAFF")
        .env("WL_DATABASE_PATH", temp.join("worklog.db"));
    cmd
}

fn run_ok(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run wl");
    assert_success(&output);
    String::from_utf8(output.stdout).unwrap()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "wl should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn add_session(temp: &Path, start: &str, end: &str, description: &str) {
    run_ok(wl(temp).args([
        "session",
        "add",
        "--staff",
        "alice",
        "--date",
        "2025-03-14",
        "--start",
        start,
        "--end",
        end,
        "--project",
        "website",
        "--description",
        description,
    ]));
}

/// Sessions 10 minutes apart merge for totals but stay separate on the timeline.
#[test]
fn test_day_merges_adjacent_sessions() {
    let temp = TempDir::new().unwrap();
    run_ok(wl(temp.path()).args(["staff", "add", "alice", "Alice", "--rate", "50"]));
    add_session(temp.path(), "09:00", "10:00", "Header");
    add_session(temp.path(), "10:10", "11:00", "Footer");

    let stdout = run_ok(wl(temp.path()).args([
        "day", "--staff", "alice", "--date", "2025-03-14", "--json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["blocks"].as_array().unwrap().len(), 2);
    assert_eq!(value["merged"].as_array().unwrap().len(), 1);
    assert_eq!(value["merged"][0]["description"], "Header; Footer");
    assert_eq!(value["total_hours"], 2.0);
    assert_eq!(value["earnings"], 100.0);
}

/// A 20 minute gap is outside the default tolerance.
#[test]
fn test_day_keeps_distant_sessions_apart() {
    let temp = TempDir::new().unwrap();
    add_session(temp.path(), "09:00", "10:00", "Header");
    add_session(temp.path(), "10:20", "11:00", "Footer");

    let stdout = run_ok(wl(temp.path()).args([
        "day", "--staff", "alice", "--date", "2025-03-14", "--json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["merged"].as_array().unwrap().len(), 2);
    assert_eq!(value["total_minutes"], 100);
}

/// The adjacency tolerance can be changed through the environment.
#[test]
fn test_tolerance_from_environment() {
    let temp = TempDir::new().unwrap();
    add_session(temp.path(), "09:00", "10:00", "Header");
    add_session(temp.path(), "10:20", "11:00", "Footer");

    let stdout = run_ok(
        wl(temp.path())
            .env("WL_ADJACENCY_TOLERANCE_MINUTES", "30")
            .args(["day", "--staff", "alice", "--date", "2025-03-14", "--json"]),
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["merged"].as_array().unwrap().len(), 1);
    assert_eq!(value["total_minutes"], 120);
}

/// Inverted intervals are rejected before anything is stored.
#[test]
fn test_session_add_rejects_inverted_interval() {
    let temp = TempDir::new().unwrap();
    let output = wl(temp.path())
        .args([
            "session", "add", "--staff", "alice", "--date", "2025-03-14", "--start", "10:00",
            "--end", "09:00",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be before end time"), "stderr: {stderr}");

    let stdout = run_ok(wl(temp.path()).args([
        "session", "list", "--staff", "alice", "--date", "2025-03-14",
    ]));
    assert_eq!(stdout, "No sessions for alice on 2025-03-14.\n");
}

/// Import reads JSON lines from stdin and feeds the report.
#[test]
fn test_import_then_report() {
    let temp = TempDir::new().unwrap();
    run_ok(wl(temp.path()).args(["staff", "add", "bob", "Bob", "--rate", "40"]));

    let input = [
        r#"{"id":"a","date":"2025-03-10","start_time":"09:00","end_time":"12:00","project":"crm"}"#,
        r#"{"id":"b","date":"2025-03-10","start_time":"11:00","end_time":"13:00","project":"crm"}"#,
        r#"{"id":"c","date":"2025-03-11","start_time":"23:00","end_time":"24:00","project":"ops"}"#,
    ]
    .join("\n");

    let mut child = wl(temp.path())
        .args(["import", "--staff", "bob"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output);
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Imported 3 sessions (0 duplicates skipped)\n"
    );

    let stdout = run_ok(wl(temp.path()).args([
        "report", "--staff", "bob", "--from", "2025-03-10", "--to", "2025-03-16", "--json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["days"][0]["total_minutes"], 240);
    assert_eq!(value["days"][1]["total_minutes"], 60);
    assert_eq!(value["totals"]["earnings"], 200.0);
}

/// Categories are deduplicated regardless of case.
#[test]
fn test_categories_deduplicate() {
    let temp = TempDir::new().unwrap();
    run_ok(wl(temp.path()).args(["category", "add", "Design"]));
    let stdout = run_ok(wl(temp.path()).args(["category", "add", "design"]));
    assert_eq!(stdout, "Category Design already exists\n");

    let stdout = run_ok(wl(temp.path()).args(["category", "list"]));
    assert_eq!(stdout, "Design\n");
}

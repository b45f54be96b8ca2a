//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary home directory.

use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_studyplan"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("STUDYPLAN_ENV")
        .env_remove("STUDYPLAN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

const GENERATE: &[&str] = &[
    "plan", "generate", "-s", "Math", "-s", "Physics", "--days", "1", "--start", "09:00", "--end",
    "17:00", "--hours", "7", "--from", "2025-11-03", "--json",
];

#[test]
fn test_plan_generate_json() {
    let home = TempDir::new().unwrap();
    let (code, stdout, stderr) = run_cli(&home, GENERATE);
    assert_eq!(code, 0, "plan generate failed: {stderr}");

    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let titles: Vec<&str> = plan["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        ["Study Math", "Study Physics", "Lunch Break", "Study Math", "Study Physics"]
    );
    assert_eq!(plan["items"][0]["start"], "2025-11-03T09:00:00");
}

#[test]
fn test_plan_show_and_toggle() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, GENERATE);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(&home, &["plan", "show", "--json"]);
    assert_eq!(code, 0);
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["summary"]["study_sessions"], 4);
    assert_eq!(shown["summary"]["completed_sessions"], 0);

    let id = shown["plan"]["items"][0]["id"].as_str().unwrap().to_string();
    let (code, stdout, _) = run_cli(&home, &["plan", "toggle", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("completed"));

    let (_, stdout, _) = run_cli(&home, &["plan", "show", "--json"]);
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["summary"]["completed_sessions"], 1);

    let (code, stdout, _) = run_cli(&home, &["plan", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Monday 2025-11-03"));
    assert!(stdout.contains("1/4 sessions completed"));
}

#[test]
fn test_plan_show_without_plan_fails() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["plan", "show"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no plan"));
}

#[test]
fn test_plan_generate_rejects_bad_input() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["plan", "generate", "--days", "2"]);
    assert_ne!(code, 0, "no subjects configured");
    assert!(stderr.starts_with("error:"));

    let (code, _, _) = run_cli(&home, &["plan", "generate", "-s", "Math", "--start", "9am"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["config", "set", "planner.subjects", "Math, Art"]);
    assert_eq!(code, 0);
    let (code, _, _) = run_cli(&home, &["config", "set", "planner.end_time", "12:00"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(&home, &["config", "get", "planner.end_time"]);
    assert_eq!(stdout.trim(), "12:00");

    let (code, _, _) = run_cli(&home, &["config", "set", "planner.end_time", "noon"]);
    assert_ne!(code, 0);

    let (code, stdout, _) = run_cli(&home, &["plan", "generate", "--days", "1", "--json"]);
    assert_eq!(code, 0);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(plan["items"][0]["subject"], "Math");
}

#[test]
fn test_config_unknown_key() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["config", "get", "nope"]);
    assert_ne!(code, 0);
}

//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

mod common;

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use predicates::prelude::*;
use serde_json::Value;

use common::Sandbox;

/// Run `generate --format json` and parse the output
fn generate_json(sandbox: &Sandbox, args: &[&str]) -> Vec<Value> {
    let output = sandbox
        .cmd()
        .arg("generate")
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    value.as_array().unwrap().clone()
}

fn timestamp(record: &Value) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(record["timestamp"].as_str().unwrap()).unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("sprints"))
        .stdout(predicate::str::contains("persona"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version_command() {
    Sandbox::new()
        .cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devmetrics"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"));
}

#[test]
fn test_short_version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devmetrics"));
}

// ─────────────────────────────────────────────────────────────────
// Persona Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_persona_list() {
    Sandbox::new()
        .cmd()
        .args(["persona", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("early_bird"))
        .stdout(predicate::str::contains("night_owl"))
        .stdout(predicate::str::contains("balanced"))
        .stdout(predicate::str::contains("contractor"));
}

#[test]
fn test_persona_list_json() {
    let output = Sandbox::new()
        .cmd()
        .args(["persona", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let personas: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(personas.as_array().unwrap().len(), 4);
    assert_eq!(personas[0]["name"], "balanced");
}

#[test]
fn test_persona_show() {
    Sandbox::new()
        .cmd()
        .args(["persona", "show", "night_owl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("America/Los_Angeles"))
        .stdout(predicate::str::contains("14:00-22:00"));
}

#[test]
fn test_persona_show_unknown() {
    Sandbox::new()
        .cmd()
        .args(["persona", "show", "ghost"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("E300"))
        .stderr(predicate::str::contains("early_bird"));
}

// ─────────────────────────────────────────────────────────────────
// Generate Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_generate_respects_persona_window() {
    let sandbox = Sandbox::new();
    let records = generate_json(
        &sandbox,
        &["--start", "2024-01-01", "--end", "2024-03-01", "--persona", "night_owl", "--seed", "7"],
    );
    assert!(!records.is_empty());

    for record in &records {
        let ts = timestamp(record);
        assert!((14..22).contains(&ts.hour()), "{} outside 14-22", ts);
        assert_ne!(ts.hour(), 18, "{} during lunch", ts);
        assert!(ts.weekday() != Weekday::Sat && ts.weekday() != Weekday::Sun);
        assert_eq!(record["timezone"], "America/Los_Angeles");
        assert!(record["file_count"].as_u64().unwrap() >= 1);
        assert!(!record["description"].as_str().unwrap().is_empty());
    }
}

#[test]
fn test_generate_is_chronological() {
    let sandbox = Sandbox::new();
    let records = generate_json(
        &sandbox,
        &["--start", "2024-01-01", "--end", "2024-04-01", "--persona", "balanced", "--seed", "11"],
    );
    let times: Vec<_> = records.iter().map(timestamp).collect();
    for pair in times.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_generate_seed_is_reproducible() {
    let sandbox = Sandbox::new();
    let args = ["--start", "2024-05-01", "--end", "2024-06-01", "--seed", "99"];
    assert_eq!(generate_json(&sandbox, &args), generate_json(&sandbox, &args));
}

#[test]
fn test_generate_empty_range() {
    let sandbox = Sandbox::new();
    let records = generate_json(&sandbox, &["--start", "2024-02-01", "--end", "2024-01-01"]);
    assert!(records.is_empty());
}

#[test]
fn test_generate_weekend_only_range() {
    let sandbox = Sandbox::new();
    // 2024-01-06 and 2024-01-07 are a Saturday and Sunday
    let records = generate_json(&sandbox, &["--start", "2024-01-06", "--end", "2024-01-08"]);
    assert!(records.is_empty());
}

#[test]
fn test_generate_unknown_persona() {
    Sandbox::new()
        .cmd()
        .args(["generate", "--persona", "nonexistent", "--days", "3"])
        .assert()
        .failure()
        .code(30)
        .stderr(predicate::str::contains("Unknown persona 'nonexistent'"))
        .stderr(predicate::str::contains("persona list"));
}

#[test]
fn test_generate_invalid_date() {
    Sandbox::new()
        .cmd()
        .args(["generate", "--start", "03/18/2024"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("E400"));
}

#[test]
fn test_generate_days_past_calendar() {
    Sandbox::new()
        .cmd()
        .args(["generate", "--days", "4000000000", "--persona", "balanced"])
        .assert()
        .failure()
        .code(40)
        .stderr(predicate::str::contains("E401"));
}

#[test]
fn test_generate_text_output() {
    Sandbox::new()
        .cmd()
        .args([
            "generate", "--start", "2024-03-04", "--end", "2024-03-05", "--persona", "contractor",
            "--seed", "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-04"))
        .stdout(predicate::str::contains("+01:00"))
        .stdout(predicate::str::contains("commits"));
}

#[test]
fn test_generate_invalid_format_rejected() {
    Sandbox::new()
        .cmd()
        .args(["generate", "--format", "yaml"])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────
// Sprints Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_sprints_json_plan_is_contiguous() {
    let output = Sandbox::new()
        .cmd()
        .args([
            "sprints", "--start", "2024-01-01", "--end", "2024-07-01", "--seed", "5", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cycles: Value = serde_json::from_slice(&output.stdout).unwrap();
    let cycles = cycles.as_array().unwrap();
    assert!(cycles.len() >= 13);
    assert_eq!(cycles[0]["start"], "2024-01-01T00:00:00");
    assert_eq!(cycles[0]["phase"], "planning");
    assert_eq!(cycles.last().unwrap()["end"], "2024-07-01T00:00:00");
    for pair in cycles.windows(2) {
        assert_eq!(pair[0]["end"], pair[1]["start"]);
    }
    for cycle in cycles {
        let intensity = cycle["intensity"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&intensity));
    }
}

#[test]
fn test_sprints_text() {
    Sandbox::new()
        .cmd()
        .args(["sprints", "--start", "2024-01-01", "--days", "28", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01 .. 2024-01-15"))
        .stdout(predicate::str::contains("planning"));
}

// ─────────────────────────────────────────────────────────────────
// Logging Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_logs_stay_off_stdout() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["-v", "generate", "--days", "10", "--seed", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    // stdout must still be valid JSON with verbose logging on
    let _: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("Generated commit patterns"));
}

#[test]
fn test_quiet_suppresses_info_logs() {
    Sandbox::new()
        .cmd()
        .args(["--quiet", "generate", "--days", "3", "--seed", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated commit patterns").not());
}

//! Integration tests for the `campsite` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the platforms, plan,
//! and ics subcommands through the actual binary, including file output, JSON
//! output, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the platforms.json fixture.
fn rules_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/platforms.json")
}

/// Helper: the binary with a clean environment and the fixture rules.
fn campsite() -> Command {
    let mut cmd = Command::cargo_bin("campsite").unwrap();
    cmd.env_remove("CAMPSITE_RULES")
        .env_remove("RUST_LOG")
        .args(["--rules", rules_path()]);
    cmd
}

/// Helper: a fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("campsite-cli-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir must be creatable");
    dir
}

// ─────────────────────────────────────────────────────────────────────────────
// platforms
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn platforms_lists_fixture_rules() {
    campsite()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("lake_parks"))
        .stdout(predicate::str::contains("Lake Parks (180 days window"))
        .stdout(predicate::str::contains("Ridge Parks (6 months window"))
        .stdout(predicate::str::contains("unusable"));
}

#[test]
fn platforms_builtin_rules_by_default() {
    Command::cargo_bin("campsite")
        .unwrap()
        .env_remove("CAMPSITE_RULES")
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("recreation_gov"));
}

#[test]
fn platforms_rules_from_env() {
    Command::cargo_bin("campsite")
        .unwrap()
        .env("CAMPSITE_RULES", rules_path())
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("ridge_parks"))
        .stdout(predicate::str::contains("recreation_gov").not());
}

#[test]
fn platforms_json() {
    let output = campsite()
        .args(["platforms", "--json"])
        .output()
        .expect("platforms should run");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output must be valid JSON");
    let entries = value.as_array().expect("top level must be an array");
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["key"], "lake_parks");
    assert_eq!(entries[0]["rule"]["maxStayDays"], 14);
    assert!(entries[2]["error"].as_str().unwrap().contains("weeks"));
    assert!(entries[3]["error"]
        .as_str()
        .unwrap()
        .contains("missing maxStayDays"));
}

// ─────────────────────────────────────────────────────────────────────────────
// plan
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn plan_day_window_text() {
    campsite()
        .args(["plan", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Arrival:  Friday, July 12, 2024"))
        .stdout(predicate::str::contains(
            "Set a reminder for: Sunday, January 14, 2024 at 7:00 AM",
        ))
        .stdout(predicate::str::contains("Notes: Lakefront loops fill within minutes."));
}

#[test]
fn plan_json_dates() {
    let output = campsite()
        .args(["plan", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "--json"])
        .output()
        .expect("plan should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["arrivalDate"], "2024-07-12");
    assert_eq!(value["bufferStartDate"], "2024-07-12");
    assert_eq!(value["bookingOpenDate"], "2024-01-14");
    assert_eq!(value["cancelOpenDate"], "2024-01-14");
    assert_eq!(value["strategy"], "coincident");
    assert_eq!(value["rule"]["name"], "Lake Parks");
}

#[test]
fn plan_full_buffer_json() {
    let output = campsite()
        .args([
            "plan",
            "-p",
            "lake_parks",
            "-c",
            "2024-07-15",
            "-n",
            "3",
            "--strategy",
            "full-buffer",
            "--json",
        ])
        .output()
        .expect("plan should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["bufferStartDate"], "2024-07-01");
    assert_eq!(value["bookingOpenDate"], "2024-01-03");
    assert_eq!(value["cancelOpenDate"], "2024-01-14");
}

#[test]
fn plan_month_window_leap_day() {
    campsite()
        .args(["plan", "-p", "ridge_parks", "-c", "2024-09-02", "-n", "2", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""bookingOpenDate": "2024-02-29""#));
}

#[test]
fn plan_unknown_platform_fails() {
    campsite()
        .args(["plan", "-p", "nowhere", "-c", "2024-07-15", "-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown platform 'nowhere'"));
}

#[test]
fn plan_invalid_rule_fails() {
    campsite()
        .args(["plan", "-p", "broken_parks", "-c", "2024-07-15", "-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rule for platform 'broken_parks'"))
        .stderr(predicate::str::contains("unknown bookingWindowType 'weeks'"));
}

#[test]
fn plan_missing_max_stay_fails() {
    campsite()
        .args(["plan", "-p", "unsized_parks", "-c", "2024-07-15", "-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rule for platform 'unsized_parks'"))
        .stderr(predicate::str::contains("missing maxStayDays"));
}

#[test]
fn plan_non_positive_nights_fail() {
    for nights in ["0", "-2"] {
        campsite()
            .args(["plan", "-p", "lake_parks", "-c", "2024-07-15", "-n", nights])
            .assert()
            .failure()
            .stderr(predicate::str::contains("positive"));
    }
}

#[test]
fn plan_bad_date_fails() {
    campsite()
        .args(["plan", "-p", "lake_parks", "-c", "2024-13-01", "-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn plan_full_buffer_rejects_stay_over_max() {
    campsite()
        .args([
            "plan",
            "-p",
            "ridge_parks",
            "-c",
            "2024-09-02",
            "-n",
            "9",
            "--strategy",
            "full-buffer",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("7-night maximum"));
}

#[test]
fn plan_with_missing_rules_file_reports_load_failure() {
    Command::cargo_bin("campsite")
        .unwrap()
        .env_remove("CAMPSITE_RULES")
        .env_remove("RUST_LOG")
        .args([
            "--rules",
            "/nonexistent/campsite/platforms.json",
            "plan",
            "-p",
            "lake_parks",
            "-c",
            "2024-07-15",
            "-n",
            "3",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load platform rules"))
        .stderr(predicate::str::contains("unknown platform"));
}

// ─────────────────────────────────────────────────────────────────────────────
// ics
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ics_booking_to_stdout() {
    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "-r", "booking"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("BEGIN:VCALENDAR\r\n"))
        .stdout(predicate::str::contains("DTSTART;VALUE=DATE:20240114\r\n"))
        .stdout(predicate::str::contains("SUMMARY:BOOK CAMPSITE - Lake Parks\r\n"));
}

#[test]
fn ics_cancel_full_buffer_to_file() {
    let dir = scratch_dir("file");
    let path = dir.join("cancel.ics");

    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "-r", "cancel"])
        .args(["--strategy", "full-buffer", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&path).expect("output file must exist");
    assert!(content.contains("DTSTART;VALUE=DATE:20240114\r\n"));
    assert!(content.contains("SUMMARY:CANCEL BUFFER DATES - Lake Parks\r\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ics_out_dir_uses_default_file_name() {
    let dir = scratch_dir("outdir");

    campsite()
        .args(["ics", "-p", "ridge_parks", "-c", "2024-09-02", "-n", "2", "-r", "booking"])
        .arg("--out-dir")
        .arg(&dir)
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.join("campsite-booking-reminder.ics"))
        .expect("reminder must be written under its default name");
    assert!(content.contains("DTSTART;VALUE=DATE:20240229\r\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ics_timed_reminder() {
    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "-r", "booking"])
        .args(["--timezone", "America/Los_Angeles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DTSTART:20240114T150000Z\r\n"));
}

#[test]
fn ics_unknown_timezone_fails() {
    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "-r", "booking"])
        .args(["--timezone", "Nowhere/Land"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone: Nowhere/Land"));
}

#[test]
fn ics_requires_reminder_type() {
    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--reminder"));
}

#[test]
fn ics_output_and_out_dir_conflict() {
    campsite()
        .args(["ics", "-p", "lake_parks", "-c", "2024-07-15", "-n", "3", "-r", "cancel"])
        .args(["-o", "a.ics", "--out-dir", "."])
        .assert()
        .failure();
}

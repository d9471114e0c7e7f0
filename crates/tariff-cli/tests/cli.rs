//! Integration tests for the `tariff` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

fn tariff() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tariff"));
    cmd.env_remove("RUST_LOG")
        .env_remove("TARIFF_INPUT")
        .env_remove("TARIFF_OUTPUT")
        .env_remove("TARIFF_BASE_IRI");
    cmd
}

/// `tariff()` wrapped so stdin can be fed from a buffer.
fn tariff_with_stdin(input: impl Into<Vec<u8>>) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from_std(tariff());
    cmd.write_stdin(input);
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Clean the fixture table into a temporary JSON-lines file.
fn cleaned(dir: &tempfile::TempDir) -> PathBuf {
    let out = dir.path().join("cleaned.jsonl");
    tariff()
        .args(["clean", "--input"])
        .arg(fixture("carpark-rates.csv"))
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    out
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── clean ───────────────────────────────────────────────────────────────────

#[test]
fn test_clean_writes_one_line_per_row() {
    let output = tariff()
        .args(["clean", "--input"])
        .arg(fixture("carpark-rates.csv"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["name"], "Bugis Junction");
    assert_eq!(
        lines[0]["weekdays_rate_2"]["pricePerEntry"]["baseRate"],
        2.0
    );
    assert_eq!(
        lines[0]["sunday_publicholiday_rate_1"]["timing"]["startTime"],
        7.0
    );
    assert_eq!(lines[3], serde_json::json!({"name": "ACE Building", "category": "Commercial"}));
}

#[test]
fn test_clean_skips_unparsed_field() {
    let output = tariff()
        .args(["clean", "--input"])
        .arg(fixture("carpark-rates.csv"))
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let capital: Value = serde_json::from_str(stdout.lines().nth(4).unwrap()).unwrap();
    assert!(capital.get("weekdays_rate_1").is_none());
    assert_eq!(capital["weekdays_rate_2"]["timing"]["startTime"], 22.0);
    assert_eq!(capital["sunday_publicholiday_rate_1"]["pricePerEntry"]["baseRate"], 0.0);
}

#[test]
fn test_clean_reads_input_from_env() {
    tariff()
        .arg("clean")
        .env("TARIFF_INPUT", fixture("carpark-rates.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Fairmont Hotel\""));
}

#[test]
fn test_clean_reads_stdin() {
    tariff_with_stdin(fs::read_to_string(fixture("carpark-rates.csv")).unwrap())
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Plaza Singapura\""));
}

#[test]
fn test_clean_verbose_logs_summary_to_stderr() {
    tariff()
        .args(["-v", "clean", "--input"])
        .arg(fixture("carpark-rates.csv"))
        .assert()
        .success()
        .stderr(predicate::str::contains("cleaned tariff table"))
        .stderr(predicate::str::contains("priced=4"))
        .stdout(predicate::str::contains("cleaned tariff table").not());
}

#[test]
fn test_clean_missing_input_fails() {
    tariff()
        .args(["clean", "--input", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

// ── triples ─────────────────────────────────────────────────────────────────

#[test]
fn test_triples_from_cleaned_file() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);

    tariff()
        .args(["triples", "--input"])
        .arg(&cleaned)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<http://cdit#BugisJunction> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://cdit#Carpark> .",
        ))
        .stdout(predicate::str::contains(
            "<http://cdit#FairmontHotel_saturday_rate_1> <http://cdit#endTime> \"23.59\"",
        ));
}

#[test]
fn test_triples_custom_base_iri() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);
    let out = dir.path().join("kb.nt");

    tariff()
        .args(["triples", "--base-iri", "urn:carpark:", "--input"])
        .arg(&cleaned)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.lines().all(|line| line.starts_with("<urn:carpark:")));
    assert!(text.contains("<urn:carpark:ACEBuilding> <urn:carpark:hasLocationCategory> <urn:carpark:Commercial> ."));
}

#[test]
fn test_triples_rejects_malformed_records() {
    tariff_with_stdin("{\"name\":\"X\",\"category\":\"Y\"}\n{\"name\":\"X\"}\n")
        .arg("triples")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

// ── query ───────────────────────────────────────────────────────────────────

#[test]
fn test_query_most_carparks() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);

    let answer = stdout_json(tariff().args(["query", "most-carparks", "--input"]).arg(&cleaned));
    // Commercial and Mixed tie at two; the alphabetically first wins.
    assert_eq!(answer, serde_json::json!({"category": "Commercial", "carparks": 2}));
}

#[test]
fn test_query_max_rate_weekday_noon() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);

    let answer = stdout_json(
        tariff()
            .args(["query", "max-rate", "--day", "weekday", "--at", "12:00", "--input"])
            .arg(&cleaned),
    );
    let rows = answer.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["category"], "Hotel");
    assert_eq!(rows[0]["carparks"], serde_json::json!(["Fairmont Hotel"]));
    assert!((rows[0]["max_rate"].as_f64().unwrap() - 0.05).abs() < 1e-9);

    assert_eq!(rows[1]["category"], "Mixed");
    assert_eq!(rows[1]["carparks"], serde_json::json!(["Plaza Singapura"]));
    assert!((rows[1]["max_rate"].as_f64().unwrap() - 0.04).abs() < 1e-9);
}

#[test]
fn test_query_max_rate_late_evening_has_only_daily_rates() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);

    let answer = stdout_json(
        tariff()
            .args(["query", "max-rate", "--day", "weekday", "--at", "22:30", "--input"])
            .arg(&cleaned),
    );
    assert_eq!(
        answer
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["category"].as_str().unwrap())
            .collect::<Vec<_>>(),
        vec!["Hotel"]
    );
}

#[test]
fn test_query_max_rate_bad_time() {
    let dir = tempfile::tempdir().unwrap();
    let cleaned = cleaned(&dir);

    tariff()
        .args(["query", "max-rate", "--day", "saturday", "--at", "noon", "--input"])
        .arg(&cleaned)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time of day"));
}

#[test]
fn test_query_max_rate_bad_day() {
    tariff()
        .args(["query", "max-rate", "--day", "friday", "--at", "12:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid day class"));
}

//! CLI command integration tests.
//! Config-dependent tests write a temp TOML file and pass it via --config.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bp_cmd() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("bp").unwrap();
    cmd.env_remove("BP_CONFIG");
    cmd
}

#[test]
fn classify_repeating_digits() {
    bp_cmd()
        .args(["classify", "1122.bit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1122.bit:"))
        .stdout(predicate::str::contains("AABB"))
        .stdout(predicate::str::contains("10K"));
}

#[test]
fn classify_no_match() {
    bp_cmd()
        .args(["classify", "hello.bit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.bit: (no patterns)"));
}

#[test]
fn classify_missing_suffix_fails() {
    bp_cmd()
        .args(["classify", "1122"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input: 1122"));
}

#[test]
fn classify_json_output() {
    let output = bp_cmd()
        .args(["classify", "--json", "20000.bit", "一二三.bit"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let wan: Vec<&str> = parsed["20000.bit"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(wan.contains(&"WanClub"));
    assert_eq!(parsed["一二三.bit"], serde_json::json!(["999CN"]));
}

#[test]
fn classify_explain_names_entries() {
    bp_cmd()
        .args(["classify", "--explain", "20000.bit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WanClub"))
        .stdout(predicate::str::contains("DigitCharacterGroup"));
}

#[test]
fn patterns_lists_catalog() {
    bp_cmd()
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("DigitCharacterGroup"))
        .stdout(predicate::str::contains("MMDD"))
        .stdout(predicate::str::contains("Hex"));
}

#[test]
fn check_single_entry() {
    bp_cmd()
        .args(["check", "WanClub", "20000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test=true serialize=WanClub"));

    bp_cmd()
        .args(["check", "WanClub", "25000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("test=false serialize=-"));
}

#[test]
fn check_unknown_entry_fails() {
    bp_cmd()
        .args(["check", "Nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown or excluded catalog entry"));
}

#[test]
fn config_file_filters_labels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bp.toml");
    std::fs::write(
        &path,
        "known_labels = [\"AABB\"]\nexclude = [\"MMDD\"]\n",
    )
    .unwrap();

    bp_cmd()
        .arg("--config")
        .arg(&path)
        .args(["classify", "1122.bit"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1122.bit: AABB\n"));

    bp_cmd()
        .arg("--config")
        .arg(&path)
        .arg("patterns")
        .assert()
        .success()
        .stdout(predicate::str::contains("MMDD (excluded)"));
}

#[test]
fn config_from_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bp.toml");
    std::fs::write(&path, "known_labels = [\"WanClub\"]\n").unwrap();

    bp_cmd()
        .env("BP_CONFIG", &path)
        .args(["classify", "20000.bit"])
        .assert()
        .success()
        .stdout(predicate::str::diff("20000.bit: WanClub\n"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bp.toml");
    std::fs::write(&path, "exclude = [\"Nope\"]\n").unwrap();

    bp_cmd()
        .arg("--config")
        .arg(&path)
        .args(["classify", "1122.bit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

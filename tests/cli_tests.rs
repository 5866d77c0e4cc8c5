// End-to-end tests for the detect-sp binary

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// X and Y correlate positively overall; within G=a the trend reverses
const SCENARIO: &str = r#"[
    {"X": 1.0, "Y": 3.0, "G": "a"},
    {"X": 2.0, "Y": 2.0, "G": "a"},
    {"X": 3.0, "Y": 1.0, "G": "a"},
    {"X": 4.0, "Y": 7.0, "G": "b"},
    {"X": 5.0, "Y": 8.0, "G": "b"},
    {"X": 6.0, "Y": 9.0, "G": "b"}
]"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn scenario_file(dir: &TempDir) -> PathBuf {
    write_file(dir, "scenario.json", SCENARIO)
}

#[test]
fn test_default_prints_flagged_rows() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("feat1"))
        .stdout(predicate::str::contains("pearson_corr"))
        .stdout(predicate::str::contains("1 rows"))
        .stderr(predicate::str::contains("2 rows, 1 flagged, 1 views"));
}

#[test]
fn test_all_rows() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--all-rows");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 rows"));
}

#[test]
fn test_views_plain_and_colored() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--views");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X, Y)"))
        .stdout(predicate::str::contains("(X, Y, G)").not());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--colored");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X, Y, G)"));
}

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--format").arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["format"], "detect-sp-json-v1");
    assert_eq!(json["policy"], "SP");
    assert_eq!(json["summary"]["total_rows"], 2);
    assert_eq!(json["summary"]["flagged_rows"], 1);
    assert_eq!(json["rows"][0]["subgroup"], "a");
    assert_eq!(json["rows"][0]["group_feat"], "G");
}

#[test]
fn test_csv_format() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--format").arg("csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "feat1,feat2,trend_type,agg_trend,group_feat,subgroup,subgroup_trend\n",
        ))
        .stdout(predicate::str::contains("X,Y,pearson_corr,"))
        .stdout(predicate::str::contains(",G,a,"));
}

#[test]
fn test_legacy_detector() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--legacy").arg("--format").arg("csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",G,a,"))
        .stdout(predicate::str::contains(",G,b,").not());
}

#[test]
fn test_magnitude_policy_filters_small_reversals() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    // aggregate r is well below 1, subgroup r is -1: difference < 5
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data)
        .arg("--policy")
        .arg("magnitude")
        .arg("--threshold")
        .arg("5");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 rows"));
}

#[test]
fn test_threshold_alone_selects_magnitude_policy() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data)
        .arg("--threshold")
        .arg("5")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["policy"], "SP_mag5");
    assert_eq!(json["summary"]["flagged_rows"], 0);
}

#[test]
fn test_colored_views_from_config() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);
    let config = write_file(&dir, "sp.toml", "colored_views = true\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(X, Y, G)"));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--config").arg(&config).arg("--all-rows");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 rows"));
}

#[test]
fn test_config_file_with_flag_override() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);
    let config = write_file(&dir, "sp.toml", "trend_types = [\"lin_reg\"]\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("--config").arg(&config).arg("--all-rows");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("lin_reg"))
        .stdout(predicate::str::contains("pearson_corr").not());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data)
        .arg("--config")
        .arg(&config)
        .arg("-t")
        .arg("rank_corr")
        .arg("--all-rows");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("rank_corr"))
        .stdout(predicate::str::contains("lin_reg").not());
}

#[test]
fn test_unknown_trend_fails() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("-t").arg("kendall_tau");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown trend type"));
}

#[test]
fn test_unknown_groupby_column_fails() {
    let dir = TempDir::new().unwrap();
    let data = scenario_file(&dir);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data).arg("-g").arg("H");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column"));
}

#[test]
fn test_missing_dataset_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(dir.path().join("nope.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));
}

#[test]
fn test_rate_trend_two_level() {
    let dir = TempDir::new().unwrap();
    let mut records = Vec::new();
    for (dept, gender, yes, no) in [
        ("easy", "f", 9, 1),
        ("easy", "m", 80, 20),
        ("hard", "f", 30, 70),
        ("hard", "m", 2, 8),
    ] {
        for i in 0..(yes + no) {
            records.push(format!(
                r#"{{"dept": "{}", "gender": "{}", "admitted": {}}}"#,
                dept,
                gender,
                i < yes
            ));
        }
    }
    let data = write_file(&dir, "admissions.json", &format!("[{}]", records.join(",")));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("detect-sp");
    cmd.arg(&data)
        .arg("-t")
        .arg("rate")
        .arg("--two-level")
        .arg("--colored");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(admitted, gender, dept)"));
}

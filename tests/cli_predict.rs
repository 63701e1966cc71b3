mod common;

use std::fs;

use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("kira-ckdrisk").unwrap();
    cmd.env_remove("KIRA_CKDRISK_ARTIFACTS");
    cmd.env("RUST_LOG", "off");
    cmd
}

fn artifact_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    common::write_artifact_dir(tmp.path());
    tmp
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn cli_help_smoke() {
    bin().arg("--help").assert().success();
    bin().args(["predict", "--help"]).assert().success();
}

#[test]
fn predict_with_defaults_is_low_risk() {
    let art = artifact_dir();
    let stdout = stdout_of(bin().arg("predict").arg("--artifacts").arg(art.path()));

    assert!(stdout.contains("eGFR: 72.59 mL/min/1.73m²"));
    assert!(stdout.contains("Stage: Mildly decreased function (Stage 2)"));
    assert!(stdout.contains("Risk: Low risk of Chronic Kidney Disease (88.08% probability)"));
    assert!(stdout.contains("Selected features: serum_creatinine, hemoglobin, eGFR"));
}

#[test]
fn predict_impaired_is_high_risk() {
    let art = artifact_dir();
    let stdout = stdout_of(
        bin()
            .arg("predict")
            .arg("--artifacts")
            .arg(art.path())
            .args(["--serum-creatinine", "3.0", "--age", "60"]),
    );

    assert!(stdout.contains("eGFR: 21.58 mL/min/1.73m²"));
    assert!(stdout.contains("Stage: Severe decrease in function (Stage 4)"));
    assert!(stdout.contains("Risk: High risk of Chronic Kidney Disease (88.08% probability)"));
}

#[test]
fn artifacts_dir_from_env() {
    let art = artifact_dir();
    let stdout = stdout_of(
        bin()
            .env("KIRA_CKDRISK_ARTIFACTS", art.path())
            .arg("predict"),
    );
    assert!(stdout.contains("Stage: Mildly decreased function (Stage 2)"));
}

#[test]
fn predict_writes_json_and_tsv() {
    let art = artifact_dir();
    let out = TempDir::new().unwrap();
    let out_dir = out.path().join("report");

    bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(art.path())
        .arg("--out")
        .arg(&out_dir)
        .args(["--json", "--tsv"])
        .assert()
        .success();

    let v: Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("ckdrisk.json")).unwrap()).unwrap();
    assert_eq!(v["tool"], "kira-ckdrisk");
    assert_eq!(v["egfr"]["stage"], 2);
    assert_eq!(v["prediction"]["label"], 0);
    assert_eq!(v["artifacts"].as_array().unwrap().len(), 4);
    assert_eq!(
        v["explainability"]["selected_feature_names"],
        json!(["serum_creatinine", "hemoglobin", "eGFR"])
    );

    let tsv = fs::read_to_string(out_dir.join("ckdrisk_features.tsv")).unwrap();
    assert_eq!(tsv.lines().count(), 20);
    assert!(tsv.lines().any(|l| l == "age\t45.000000\t45.000000\tno"));
}

#[test]
fn predict_from_input_file_reports_warnings() {
    let art = artifact_dir();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("patient.json");
    let record = json!({
        "sex": "female",
        "age": 45,
        "blood_pressure": 80.0,
        "specific_gravity": 1.020,
        "albumin": 0,
        "sugar": 0,
        "blood_glucose_random": 100.0,
        "blood_urea": 40.0,
        "serum_creatinine": 1.2,
        "sodium": 137.0,
        "potassium": 4.5,
        "hemoglobin": 13.5,
        "packed_cell_volume": 40.0,
        "white_blood_cell_count": 9000.0,
        "red_blood_cell_count": 4.8,
        "hypertension": "no",
        "diabetes": "Yes",
        "anemia": "no",
        "edema": "no"
    });
    fs::write(&input, record.to_string()).unwrap();

    let stdout = stdout_of(
        bin()
            .arg("predict")
            .arg("--artifacts")
            .arg(art.path())
            .arg("--input")
            .arg(&input),
    );
    assert!(stdout.contains("eGFR: 54.54 mL/min/1.73m²"));
    assert!(stdout.contains("Stage: Moderate decrease in function (Stage 3)"));
    assert!(stdout.contains("warnings:"));
    assert!(stdout.contains("diabetes: unrecognised answer 'Yes' treated as 'no'"));
}

#[test]
fn invalid_observation_exits_with_validation_code() {
    let art = artifact_dir();
    let out = bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(art.path())
        .args(["--age", "0", "--potassium", "12"])
        .assert()
        .failure()
        .code(3)
        .get_output()
        .clone();
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("invalid input"));
    assert!(stderr.contains("age"));
    assert!(stderr.contains("potassium"));
    assert!(out.stdout.is_empty());
}

#[test]
fn bad_sex_in_input_file_is_validation_error() {
    let art = artifact_dir();
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("patient.json");
    let mut record: Value = serde_json::to_value(
        kira_ckdrisk::clinical::ClinicalObservation::default(),
    )
    .unwrap();
    record["sex"] = json!("unknown");
    fs::write(&input, record.to_string()).unwrap();

    bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(art.path())
        .arg("--input")
        .arg(&input)
        .assert()
        .code(3);
}

#[test]
fn unreadable_input_file_exits_with_validation_code() {
    let art = artifact_dir();
    bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(art.path())
        .arg("--input")
        .arg(art.path().join("no_such_patient.json"))
        .assert()
        .failure()
        .code(3);
}

#[test]
fn missing_artifacts_exit_with_startup_code() {
    let tmp = TempDir::new().unwrap();
    bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(tmp.path().join("absent"))
        .assert()
        .failure()
        .code(5);
}

#[test]
fn artifacts_load_before_observation_is_read() {
    let tmp = TempDir::new().unwrap();
    bin()
        .arg("predict")
        .arg("--artifacts")
        .arg(tmp.path())
        .args(["--age", "0"])
        .assert()
        .code(5);
}

#[test]
fn egfr_command_prints_value_and_stage() {
    let stdout = stdout_of(bin().args([
        "egfr",
        "--creatinine",
        "1.2",
        "--age",
        "45",
        "--sex",
        "female",
    ]));
    assert_eq!(
        stdout,
        "eGFR: 54.54 mL/min/1.73m²\nStage: Moderate decrease in function (Stage 3)\n"
    );
}

#[test]
fn egfr_command_rejects_zero_creatinine() {
    bin()
        .args(["egfr", "--creatinine", "0", "--age", "45", "--sex", "male"])
        .assert()
        .code(3);
}

#[test]
fn validate_command_reports_artifacts() {
    let art = artifact_dir();
    let stdout = stdout_of(bin().arg("validate").arg("--artifacts").arg(art.path()));

    assert!(stdout.starts_with("kira-ckdrisk validate ok\n"));
    assert!(stdout.contains("features: 19"));
    assert!(stdout.contains("selected: 3"));
    assert!(stdout.contains("selected features: serum_creatinine, hemoglobin, eGFR"));
    assert_eq!(stdout.lines().filter(|l| l.starts_with("scaler\t")).count(), 1);
    assert_eq!(
        stdout
            .lines()
            .filter(|l| l.starts_with("classifier\t"))
            .count(),
        1
    );
}

#[test]
fn validate_command_fails_on_inconsistent_artifacts() {
    let art = artifact_dir();
    fs::write(
        art.path().join("selector.json"),
        json!({ "support": [true, false] }).to_string(),
    )
    .unwrap();
    bin()
        .arg("validate")
        .arg("--artifacts")
        .arg(art.path())
        .assert()
        .code(5);
}

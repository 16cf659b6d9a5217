#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;

fn model_file(model: &serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{model}").expect("write model");
    file
}

fn grid_model() -> serde_json::Value {
    let mut rects = Vec::new();
    for row in 0..3 {
        for col in 0..3 {
            rects.push(json!({"x": col as f64 * 8.0, "y": row as f64 * 6.0}));
        }
    }
    // Entries without numeric coordinates are skipped by the input adapter.
    rects.push(json!({"x": "none", "y": 0.0}));
    json!({"detect": {"rects": rects}})
}

#[test]
fn prints_a_report_for_a_regular_grid() {
    let file = model_file(&grid_model());

    Command::cargo_bin("grid-match")
        .expect("binary")
        .args(["--input"])
        .arg(file.path())
        .args(["--model", "detect", "--sep-x", "4", "--sep-y", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"oneStepCount\":6"))
        .stdout(predicate::str::contains("correspondences"))
        .stdout(predicate::str::contains("objX"));
}

#[test]
fn unknown_model_stage_fails_with_config_error() {
    let file = model_file(&grid_model());

    Command::cargo_bin("grid-match")
        .expect("binary")
        .args(["--input"])
        .arg(file.path())
        .args(["--model", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not in the model"));
}

#[test]
fn spacing_failure_still_prints_partial_diagnostics() {
    let model = json!({"detect": {"rects": [
        {"x": 0.0, "y": 0.0},
        {"x": 10.0, "y": 7.0},
    ]}});
    let file = model_file(&model);

    Command::cargo_bin("grid-match")
        .expect("binary")
        .args(["--input"])
        .arg(file.path())
        .args(["--model", "detect"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"twoStepCount\":0"))
        .stderr(predicate::str::contains("2-step tolerance band"));
}

// CLI integration tests for the headless subcommands.
use std::process::Command;

use serde_json::Value;

mod common;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_cptcore");
    Command::new(exe)
}

fn fixture_args() -> [String; 4] {
    [
        "--parse".to_string(),
        common::fixture_path("response_parse.json").display().to_string(),
        "--classify".to_string(),
        common::fixture_path("response_classify.json").display().to_string(),
    ]
}

#[test]
fn table_prints_layers() {
    let out = cmd()
        .arg("table")
        .args(fixture_args())
        .output()
        .expect("table");
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).expect("utf8");
    assert!(text.contains("geotechnicalSoilName"));
    assert!(text.contains("Klei, zwak zandig"));
}

#[test]
fn table_exports_complete_cpt_rows_to_csv() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("cpt.csv");

    let out = cmd()
        .arg("table")
        .args(fixture_args())
        .args(["--cpt", "--complete", "-o", path.to_str().unwrap()])
        .output()
        .expect("table");
    assert!(out.status.success());

    let mut reader = csv::Reader::from_path(&path).expect("csv");
    assert_eq!(reader.records().count(), 19);
}

#[test]
fn render_writes_png_and_svg() {
    let temp = tempfile::tempdir().expect("tempdir");
    for name in ["profile.png", "profile.svg"] {
        let path = temp.path().join(name);
        let out = cmd()
            .arg("render")
            .args(fixture_args())
            .args(["-o", path.to_str().unwrap()])
            .output()
            .expect("render");
        assert!(out.status.success(), "{name}");
        assert!(std::fs::metadata(&path).expect("written").len() > 0);
    }
}

#[test]
fn render_honours_config_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = temp.path().join("config.json");
    std::fs::write(&config, r#"{"plot": {"figsize": [3.0, 4.0], "dpi": 40.0}}"#).unwrap();
    let path = temp.path().join("small.png");

    let out = cmd()
        .args(["--config", config.to_str().unwrap(), "render"])
        .args(fixture_args())
        .args(["-o", path.to_str().unwrap()])
        .output()
        .expect("render");
    assert!(out.status.success());
    let img = image::open(&path).expect("png").to_rgb8();
    assert_eq!(img.dimensions(), (120, 160));
}

#[test]
fn invalid_classification_fails_with_message() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut classify = common::fixture("response_classify.json");
    classify.as_object_mut().unwrap().remove("phi");
    let path = temp.path().join("classify.json");
    std::fs::write(&path, classify.to_string()).unwrap();

    let out = cmd()
        .arg("table")
        .args([
            "--parse",
            common::fixture_path("response_parse.json").to_str().unwrap(),
            "--classify",
            path.to_str().unwrap(),
        ])
        .output()
        .expect("table");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("phi"), "{stderr}");
}

#[test]
fn classify_request_copies_penetration_length() {
    let out = cmd()
        .args([
            "classify-request",
            "--parse",
            common::fixture_path("response_parse.json").to_str().unwrap(),
        ])
        .output()
        .expect("classify-request");
    assert!(out.status.success());
    let body: Value = serde_json::from_slice(&out.stdout).expect("json");
    assert_eq!(
        body["data"]["correctedPenetrationLength"],
        body["data"]["penetrationLength"]
    );
}

use std::fs;
use std::path::Path;

use assert_cmd::Command;

#[path = "../../elev_compare/tests/common/mod.rs"]
mod common;
use common::{fit_file, sample_file};

fn write(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path.display().to_string()
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_help_smoke() {
    let mut cmd = Command::cargo_bin("elev-compare").unwrap();
    cmd.arg("--help");
    cmd.assert().success();
}

#[test]
fn single_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.fit", &fit_file(&[(0, 100.0)]));
    let output = Command::cargo_bin("elev-compare")
        .unwrap()
        .args([a.as_str(), "--no-plot"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("at least two"));
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("nope_a.fit").display().to_string();
    let b = dir.path().join("nope_b.fit").display().to_string();
    let output = Command::cargo_bin("elev-compare")
        .unwrap()
        .args([a.as_str(), b.as_str(), "--no-plot"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("failed to read"));
}

#[test]
fn all_empty_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.fit", &[]);
    let b = write(dir.path(), "b.fit", &[]);
    let output = Command::cargo_bin("elev-compare")
        .unwrap()
        .args([a.as_str(), b.as_str(), "--no-plot"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("nothing to compare"));
}

#[test]
fn json_report_lists_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let whole = sample_file();
    let a = write(dir.path(), "a.fit", &whole);
    let b = write(dir.path(), "b.fit", &whole[..whole.len() - 5]);
    let c = write(dir.path(), "c.fit", &[]);

    let output = Command::cargo_bin("elev-compare")
        .unwrap()
        .args([
            a.as_str(),
            b.as_str(),
            c.as_str(),
            "--no-plot",
            "--json",
            "--units",
            "metric",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["units"], "metric");
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0]["samples"], 3);
    assert_eq!(files[1]["truncated"], true);
    assert_eq!(files[1]["samples"], 2);
    assert_eq!(files[2]["plotted"], false);
    assert_eq!(report["bounds"]["y_max"], 5.0 + 10.0);
    assert_eq!(report["bounds"]["y_min"], -10.0);
}

#[test]
fn default_run_renders_png_and_svg() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.fit", &sample_file());
    let b = write(
        dir.path(),
        "b.fit",
        &fit_file(&[(0, 250.0), (1500, 240.0), (4000, 262.0)]),
    );
    let png = dir.path().join("overlay.png");
    let svg = dir.path().join("overlay.svg");

    let output = Command::cargo_bin("elev-compare")
        .unwrap()
        .args([a.as_str(), b.as_str()])
        .arg("-o")
        .arg(&png)
        .arg("--svg")
        .arg(&svg)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr_of(&output));

    assert!(fs::metadata(&png).unwrap().len() > 0);
    let svg_text = fs::read_to_string(&svg).unwrap();
    assert!(svg_text.contains("Elevation Comparison"));
    assert!(svg_text.contains("a.fit"));
    assert!(svg_text.contains("b.fit"));
}

//! End-to-end tests for the mbira binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn mbira() -> Command {
    Command::cargo_bin("mbira").expect("binary not built")
}

fn write_tune(dir: &tempfile::TempDir, name: &str, notation: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, notation).expect("failed to write tune");
    path
}

#[test]
fn test_render_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "tune.mb", "4 e 1 c 2 (c e g)\n");
    let output = dir.path().join("tune.svg");

    mbira()
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let svg = fs::read_to_string(&output).expect("no output written");
    assert!(svg.starts_with("<?xml version=\"1.0\"?>\n<svg"));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_render_honors_layout_flags() {
    let dir = tempfile::tempdir().unwrap();
    // Four 4-beat measures, two measures per tab: two translated groups.
    let input = write_tune(&dir, "tune.mb", "4 c c c c\n");
    let output = dir.path().join("tune.svg");

    mbira()
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-b")
        .arg("4")
        .arg("-m")
        .arg("2")
        .assert()
        .success();

    let svg = fs::read_to_string(&output).unwrap();
    assert_eq!(svg.matches("<g transform=\"translate(").count(), 2);
}

#[test]
fn test_render_rejects_zero_beats() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "tune.mb", "2 c\n");

    mbira()
        .arg("render")
        .arg(&input)
        .arg("-b")
        .arg("0")
        .assert()
        .failure();
}

#[test]
fn test_render_parse_error_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "bad.mb", "2 c ! d\n");
    let output = dir.path().join("bad.svg");

    mbira()
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected character '!'"));

    assert!(!output.exists());
}

#[test]
fn test_render_reports_measure_overflow() {
    let dir = tempfile::tempdir().unwrap();
    // 2+2+2+4 = 10 beats crammed into an 8-beat measure.
    let input = write_tune(&dir, "overflow.mb", "2 c d e 4 f\n");

    mbira()
        .arg("render")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("eighth beats"));
}

#[test]
fn test_render_missing_input() {
    mbira()
        .arg("render")
        .arg("no_such_file.mb")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_check_prints_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "tune.mb", "4 e 1 c 2 (c e g)\n");

    mbira()
        .arg("check")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 symbols"));
}

#[test]
fn test_check_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "tune.mb", "2 (c e g)\n");

    mbira()
        .arg("check")
        .arg(&input)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Chord\""));
}

#[test]
fn test_check_octave_floor() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_tune(&dir, "tune.mb", "< c\n");

    mbira()
        .arg("check")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("octave 0"));
}

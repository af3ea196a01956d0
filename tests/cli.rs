//! Smoke tests of the `nebula` binary.

extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn renders_a_small_png() {
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("tiny.png");

    Command::cargo_bin("nebula")
        .unwrap()
        .args(&[
            "--output",
            outfile.to_str().unwrap(),
            "--steps",
            "0.15,0.1125",
            "--min-iterations",
            "5",
            "--max-iterations",
            "200",
            "--threads",
            "1",
        ])
        .assert()
        .success();

    let img = image::open(&outfile).unwrap().to_rgb();
    assert_eq!(img.dimensions(), (20, 20));
}

#[test]
fn rejects_a_degenerate_viewport() {
    Command::cargo_bin("nebula")
        .unwrap()
        .args(&["--output", "unused.png", "--imag", "1.0,1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn rejects_an_unwritable_output_path() {
    Command::cargo_bin("nebula")
        .unwrap()
        .args(&[
            "--output",
            "no/such/directory/out.png",
            "--steps",
            "0.15,0.1125",
            "--min-iterations",
            "5",
            "--max-iterations",
            "200",
            "--threads",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not write"));
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn renders_a_small_image() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("small.png");
    Command::cargo_bin("histobrot")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "40x30", "-a", "2", "-t", "1"])
        .assert()
        .success();
    let image = image::open(&out).unwrap().to_rgb();
    assert_eq!(image.dimensions(), (40, 30));
}

#[test]
fn accepts_negative_centers_and_palettes() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("zoomed.png");
    Command::cargo_bin("histobrot")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "24x16",
            "-c",
            "-0.75,0.1",
            "-w",
            "0.5",
            "-p",
            "grayscale",
            "-i",
            "300",
        ])
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn rejects_a_bad_size() {
    Command::cargo_bin("histobrot")
        .unwrap()
        .args(&["-o", "never.png", "-s", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_a_zero_width() {
    Command::cargo_bin("histobrot")
        .unwrap()
        .args(&["-o", "never.png", "-w", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("View width must be positive"));
}

#[test]
fn requires_an_output() {
    Command::cargo_bin("histobrot")
        .unwrap()
        .assert()
        .failure();
}

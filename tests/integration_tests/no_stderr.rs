// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{get_cmd_output, skyscale, write_catalogue};

#[test]
fn test_start_time_no_stderr() {
    let cmd = skyscale().args(["start-time", "-vv"]).ok();
    assert!(cmd.is_ok(), "start-time failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_settings_no_stderr() {
    let cmd = skyscale().args(["settings", "-v"]).ok();
    assert!(cmd.is_ok(), "settings failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_sky_filter_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let output = tmp_dir.path().join("sky.txt");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "sky-filter",
            "--catalogue", &format!("{}", catalogue.display()),
            "--radius", "1",
            "--output", &format!("{}", output.display()),
            "-vvv",
        ])
        .ok();
    assert!(cmd.is_ok(), "sky-filter failed: {}", cmd.err().unwrap());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

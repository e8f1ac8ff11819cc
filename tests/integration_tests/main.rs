// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

#[cfg(unix)]
mod campaign;
mod no_stderr;

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;
use tempfile::TempDir;

fn skyscale() -> Command {
    Command::cargo_bin("skyscale").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a small text catalogue around (60°, -30°). Separations from the
/// pointing are 0°, 0.5°, 2°, 4° and 10°.
fn write_catalogue(dir: &Path) -> PathBuf {
    let file = dir.join("catalogue.txt");
    let mut f = File::create(&file).unwrap();
    f.write_all(
        indoc! {"
            # RA Dec I
            60.0 -30.0 1.0
            60.0 -30.5 2.0
            60.0 -32.0 3.0
            60.0 -34.0 4.0
            60.0 -40.0 5.0
        "}
        .as_bytes(),
    )
    .unwrap();
    file
}

#[test]
fn test_start_time() {
    let cmd = skyscale()
        .args(["start-time", "--ra", "60", "--length", "900"])
        .ok();
    assert!(cmd.is_ok(), "start-time failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("900 s: start 2000-01-01 "), "{stdout}");
}

#[test]
fn test_start_time_for_every_scale() {
    let cmd = skyscale().args(["start-time"]).ok();
    assert!(cmd.is_ok(), "start-time failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    for scale in ["large (14400 s)", "medium (3600 s)", "small (900 s)"] {
        assert!(stdout.contains(scale), "{stdout}");
    }
}

#[test]
fn test_start_time_bad_ra() {
    let cmd = skyscale()
        .args(["start-time", "--ra", "400", "--length", "900"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("400"), "{stderr}");
}

#[test]
fn test_settings_printed() {
    let cmd = skyscale().args(["settings"]).ok();
    assert!(cmd.is_ok(), "settings failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("# sim_small.ini"), "{stdout}");
    assert!(stdout.contains("oskar_vis_filename=sim_small.vis"), "{stdout}");
    assert!(stdout.contains("input_vis_data=sim_large.vis"), "{stdout}");
    assert!(stdout.contains("root_path=img_wproj_medium"), "{stdout}");
}

#[test]
fn test_settings_written() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let out = tmp_dir.path().join("ini");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "settings",
            "--scales", "small",
            "--algorithms", "FFT", "DFT 2D",
            "--output-dir", &format!("{}", out.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "settings failed: {}", cmd.err().unwrap());

    let sim = std::fs::read_to_string(out.join("sim_small.ini")).unwrap();
    assert!(sim.contains("[observation]\n"), "{sim}");
    assert!(sim.contains("num_channels=1\n"), "{sim}");
    assert!(out.join("img_fft_small.ini").exists());
    assert!(out.join("img_dft2d_small.ini").exists());
    assert!(!out.join("sim_large.ini").exists());
}

#[test]
fn test_sky_filter() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let output = tmp_dir.path().join("near.txt");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "sky-filter",
            "--catalogue", &format!("{}", catalogue.display()),
            "--ra", "60",
            "--dec", "-30",
            "--radius", "3",
            "--output", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "sky-filter failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("'near': 3"), "{stdout}");

    // Brightest first.
    let sky = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = sky.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(lines, vec!["60 -32 3", "60 -30.5 2", "60 -30 1"]);
}

#[test]
fn test_sky_filter_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let output = tmp_dir.path().join("near.txt");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "sky-filter",
            "--dry-run",
            "--catalogue", &format!("{}", catalogue.display()),
            "--radius", "3",
            "--output", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "sky-filter failed: {}", cmd.err().unwrap());
    assert!(!output.exists());
}

#[test]
fn test_run_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let work_dir = tmp_dir.path().join("work");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "run",
            "--dry-run",
            "--catalogue", &format!("{}", catalogue.display()),
            "--work-dir", &format!("{}", work_dir.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "run --dry-run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("5 catalogue sources"), "{stdout}");
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    // Nothing is made.
    assert!(!work_dir.exists());
}

#[test]
fn test_run_without_catalogue() {
    let cmd = skyscale().args(["run", "--dry-run"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No catalogue was supplied"), "{stderr}");
}

#[test]
fn test_missing_oskar() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let work_dir = tmp_dir.path().join("work");
    let bin_dir = tmp_dir.path().join("no_oskar_here");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "simulate",
            "--catalogue", &format!("{}", catalogue.display()),
            "--work-dir", &format!("{}", work_dir.display()),
            "--oskar-bin-dir", &format!("{}", bin_dir.display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Scale 'large'"), "{stderr}");
    assert!(stderr.contains("--oskar-bin-dir"), "{stderr}");
    // The first scale's sky model was written before the failure.
    assert!(work_dir.join("sky_large.txt").exists());
}

#[test]
fn test_image_without_visibilities() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "image",
            "--work-dir", &format!("{}", tmp_dir.path().display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("sim_large.vis"), "{stderr}");
}

#[test]
fn test_args_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let args_file = tmp_dir.path().join("args.toml");
    std::fs::write(
        &args_file,
        indoc! {r#"
            ra = 10.0
            algorithms = ["DFT 3D"]

            [[scales]]
            name = "tiny"
            max_radius_deg = 0.5
            length_sec = 600.0
            num_time_steps = 10
            num_channels = 1
            fov_deg = 0.5
            num_pixels = 512
        "#},
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "settings",
            &format!("{}", args_file.display()),
            "--save-toml", &format!("{}", saved.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "settings failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("oskar_vis_filename=sim_tiny.vis"), "{stdout}");
    assert!(stdout.contains("root_path=img_dft3d_tiny"), "{stdout}");
    assert!(stdout.contains("size=512"), "{stdout}");
    assert!(!stdout.contains("sim_small"), "{stdout}");

    // The saved arguments reproduce the same settings.
    let cmd = skyscale()
        .args(["settings", &format!("{}", saved.display())])
        .ok();
    assert!(cmd.is_ok(), "settings failed: {}", cmd.err().unwrap());
    let (stdout2, _) = get_cmd_output(cmd);
    assert!(stdout2.contains("oskar_vis_filename=sim_tiny.vis"), "{stdout2}");
    assert!(stdout2.contains("root_path=img_dft3d_tiny"), "{stdout2}");
}

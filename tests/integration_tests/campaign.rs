// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whole campaigns, run against stand-ins for the OSKAR applications.

use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{get_cmd_output, skyscale, write_catalogue};

const SIMULATOR: &str = r#"vis=$(sed -n 's/^oskar_vis_filename=//p' "$1")
echo "simulating $vis"
: > "$vis""#;

const IMAGER: &str = r#"root=$(sed -n 's/^root_path=//p' "$1")
: > "$root.fits""#;

const BROKEN_IMAGER: &str = r#"echo "starting up" >&2
echo "out of GPU memory" >&2
exit 3"#;

/// Make a directory of executable shell scripts named like the OSKAR
/// applications.
fn fake_oskar(dir: &Path, imager: &str) -> PathBuf {
    let bin_dir = dir.join("bin");
    std::fs::create_dir(&bin_dir).unwrap();
    for (name, body) in [
        ("oskar_sim_interferometer", SIMULATOR),
        ("oskar_imager", imager),
    ] {
        let path = bin_dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    bin_dir
}

fn num_sources(sky_file: &Path) -> usize {
    std::fs::read_to_string(sky_file)
        .unwrap()
        .lines()
        .filter(|l| !l.starts_with('#'))
        .count()
}

#[test]
fn test_full_campaign() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let bin_dir = fake_oskar(tmp_dir.path(), IMAGER);
    let work_dir = tmp_dir.path().join("work");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "run",
            "--catalogue", &format!("{}", catalogue.display()),
            "--work-dir", &format!("{}", work_dir.display()),
            "--oskar-bin-dir", &format!("{}", bin_dir.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "run failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Campaign of 3 scales complete"), "{stdout}");

    for (scale, expected) in [("large", 4), ("medium", 3), ("small", 2)] {
        assert_eq!(num_sources(&work_dir.join(format!("sky_{scale}.txt"))), expected);
        assert!(!work_dir.join(format!("sim_{scale}.osm")).exists());
        for file in [
            format!("sim_{scale}.ini"),
            format!("sim_{scale}.vis"),
            format!("img_wproj_{scale}.ini"),
            format!("img_wproj_{scale}.fits"),
        ] {
            assert!(work_dir.join(&file).exists(), "{file} is missing");
        }
    }

    // The simulator was given the campaign's sky model.
    let ini = std::fs::read_to_string(work_dir.join("sim_medium.ini")).unwrap();
    assert!(ini.contains("oskar_sky_model/file=sky_medium.txt\n"), "{ini}");
    // The imager was told to read what the simulator wrote.
    let ini = std::fs::read_to_string(work_dir.join("img_wproj_small.ini")).unwrap();
    assert!(ini.contains("input_vis_data=sim_small.vis\n"), "{ini}");
    // The large scale isn't imaged on the GPU.
    let ini = std::fs::read_to_string(work_dir.join("img_wproj_large.ini")).unwrap();
    assert!(ini.contains("fft/use_gpu=false\n"), "{ini}");
    assert!(ini.contains("fft/grid_on_gpu=false\n"), "{ini}");
}

#[test]
fn test_phases_run_separately() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let bin_dir = fake_oskar(tmp_dir.path(), IMAGER);
    let work_dir = tmp_dir.path().join("work");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "simulate",
            "--catalogue", &format!("{}", catalogue.display()),
            "--work-dir", &format!("{}", work_dir.display()),
            "--oskar-bin-dir", &format!("{}", bin_dir.display()),
            "--scales", "small", "medium",
            "--parallel",
        ])
        .ok();
    assert!(cmd.is_ok(), "simulate failed: {}", cmd.err().unwrap());
    assert!(work_dir.join("sim_small.vis").exists());
    assert!(work_dir.join("sim_medium.vis").exists());
    assert!(!work_dir.join("sim_large.vis").exists());
    assert!(!work_dir.join("img_wproj_small.fits").exists());

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "image",
            "--work-dir", &format!("{}", work_dir.display()),
            "--oskar-bin-dir", &format!("{}", bin_dir.display()),
            "--scales", "medium", "small",
            "--algorithms", "FFT", "DFT 3D",
        ])
        .ok();
    assert!(cmd.is_ok(), "image failed: {}", cmd.err().unwrap());
    for file in [
        "img_fft_small.fits",
        "img_fft_medium.fits",
        "img_dft3d_small.fits",
        "img_dft3d_medium.fits",
    ] {
        assert!(work_dir.join(file).exists(), "{file} is missing");
    }
}

#[test]
fn test_imager_failure() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_catalogue(tmp_dir.path());
    let bin_dir = fake_oskar(tmp_dir.path(), BROKEN_IMAGER);
    let work_dir = tmp_dir.path().join("work");

    #[rustfmt::skip]
    let cmd = skyscale()
        .args([
            "run",
            "--catalogue", &format!("{}", catalogue.display()),
            "--work-dir", &format!("{}", work_dir.display()),
            "--oskar-bin-dir", &format!("{}", bin_dir.display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.starts_with("Error: "), "{stderr}");
    assert!(stderr.contains("Scale 'large': imaging failed"), "{stderr}");
    assert!(stderr.contains("out of GPU memory"), "{stderr}");

    // Every scale was simulated before imaging started.
    for scale in ["large", "medium", "small"] {
        assert!(work_dir.join(format!("sim_{scale}.vis")).exists());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Engines backed by the OSKAR command-line applications.
//!
//! Each job's settings are written as an INI file into the working directory
//! and the application is run on it. Relative paths in the settings (the
//! visibility file, image roots, the sky model) are relative to the working
//! directory.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, log_enabled, trace, Level::Trace};

use super::{EngineError, EngineProvider, Imager, Simulator};
use crate::{
    catalogue::{write_sky_model_file, SkyModel},
    constants::{OSKAR_IMAGER, OSKAR_SIM_INTERFEROMETER},
    filenames::sky_model_filename,
    settings::SettingsTree,
};

/// The number of stderr lines kept when an application fails.
const STDERR_TAIL_LINES: usize = 20;

/// Where to find the OSKAR applications and where to run them.
#[derive(Debug, Clone)]
pub struct OskarApps {
    /// The directory containing the executables. If this is `None`, they are
    /// looked up in `PATH`.
    pub bin_dir: Option<PathBuf>,

    pub work_dir: PathBuf,
}

impl OskarApps {
    pub fn new(bin_dir: Option<PathBuf>, work_dir: PathBuf) -> OskarApps {
        OskarApps { bin_dir, work_dir }
    }

    fn executable(&self, app: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(app),
            None => PathBuf::from(app),
        }
    }

    /// Write the settings next to the outputs and run the application on
    /// them. `stem` names the INI file.
    fn execute(&self, settings: &SettingsTree, stem: &Path) -> Result<(), EngineError> {
        let app = settings.app();
        let ini = append_suffix(stem, ".ini");
        settings.write_ini(&self.work_dir.join(&ini))?;

        let exe = self.executable(app);
        debug!(
            "Running '{} {}' in {}",
            exe.display(),
            ini.display(),
            self.work_dir.display()
        );
        let output = Command::new(&exe)
            .arg(&ini)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| EngineError::Spawn {
                app: exe.display().to_string(),
                err,
            })?;

        if log_enabled!(Trace) {
            for line in String::from_utf8_lossy(&output.stdout).lines() {
                trace!("{app}: {line}");
            }
        }
        if !output.status.success() {
            return Err(EngineError::Failed {
                app: app.to_string(),
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(())
    }
}

impl EngineProvider for OskarApps {
    fn simulator(&self) -> Box<dyn Simulator + '_> {
        Box::new(OskarSimulator { apps: self })
    }

    fn imager(&self) -> Box<dyn Imager + '_> {
        Box::new(OskarImager { apps: self })
    }
}

/// Runs `oskar_sim_interferometer`.
pub struct OskarSimulator<'a> {
    apps: &'a OskarApps,
}

impl Simulator for OskarSimulator<'_> {
    fn run(&mut self, settings: &SettingsTree, sky: &SkyModel) -> Result<(), EngineError> {
        let vis = settings
            .get("interferometer/oskar_vis_filename")
            .ok_or_else(|| EngineError::MissingSetting {
                app: OSKAR_SIM_INTERFEROMETER.to_string(),
                key: "interferometer/oskar_vis_filename",
            })?;
        let stem = Path::new(vis).with_extension("");

        // Same file and contents as the campaign's record of this subset, so
        // there is one sky model per scale.
        let sky_file = sky_model_filename(&sky.name);
        write_sky_model_file(&self.apps.work_dir.join(&sky_file), sky)?;
        let mut settings = settings.clone();
        settings.set("sky/oskar_sky_model/file", sky_file.display().to_string());

        self.apps.execute(&settings, &stem)
    }
}

/// Runs `oskar_imager`.
pub struct OskarImager<'a> {
    apps: &'a OskarApps,
}

impl Imager for OskarImager<'_> {
    fn run(&mut self, settings: &SettingsTree) -> Result<(), EngineError> {
        let root = settings
            .get("image/root_path")
            .ok_or_else(|| EngineError::MissingSetting {
                app: OSKAR_IMAGER.to_string(),
                key: "image/root_path",
            })?;
        self.apps.execute(settings, Path::new(root))
    }
}

/// Unlike [`Path::with_extension`], dots already in `stem` are kept.
fn append_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut s = stem.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

pub(super) fn stderr_tail(stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

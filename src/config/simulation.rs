// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration of the visibility simulator.

use std::path::{Path, PathBuf};

use hifitime::Epoch;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{ConfigError, Pointing, ScaleSpec};
use crate::{
    constants::*,
    filenames::{ms_filename, vis_filename},
    settings::{float_value, SettingsTree},
    time::{compute_start_time, format_utc},
};

/// How the simulator treats polarisation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PolMode {
    /// Stokes I only.
    #[default]
    Scalar,

    /// All four polarisation products.
    Full,
}

lazy_static::lazy_static! {
    pub(crate) static ref POL_MODES_COMMA_SEPARATED: String = PolMode::iter().join(", ");
}

/// The instrument being simulated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telescope {
    /// A directory describing the station layouts. It is never read by
    /// this crate.
    pub input_directory: PathBuf,

    #[serde(default)]
    pub pol_mode: PolMode,
}

impl Default for Telescope {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from(DEFAULT_TELESCOPE_DIR),
            pol_mode: PolMode::Scalar,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationConfig {
    pub phase_centre: Pointing,

    pub start_time: Epoch,

    /// \[seconds\]
    pub length_sec: f64,

    pub num_time_steps: usize,

    /// \[Hz\]
    pub start_frequency_hz: f64,

    /// \[Hz\]
    pub frequency_inc_hz: f64,

    pub num_channels: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterferometerConfig {
    /// \[Hz\]
    pub channel_bandwidth_hz: f64,

    /// \[seconds\]
    pub time_average_sec: f64,

    pub max_time_samples_per_block: usize,

    pub ms_filename: PathBuf,

    pub vis_filename: PathBuf,
}

/// Everything the simulator needs to know about one scale, apart from the
/// sky model.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// The scale this config was made for.
    pub name: String,

    pub max_sources_per_chunk: usize,

    pub observation: ObservationConfig,

    pub telescope: Telescope,

    pub interferometer: InterferometerConfig,
}

impl SimulationConfig {
    pub fn new(
        scale: &ScaleSpec,
        pointing: Pointing,
        telescope: &Telescope,
    ) -> Result<SimulationConfig, ConfigError> {
        scale.validate()?;
        pointing.validate()?;

        let start_time = compute_start_time(pointing.ra_deg, scale.length_sec)?;

        Ok(SimulationConfig {
            name: scale.name.clone(),
            max_sources_per_chunk: MAX_SOURCES_PER_CHUNK,
            observation: ObservationConfig {
                phase_centre: pointing,
                start_time,
                length_sec: scale.length_sec,
                num_time_steps: scale.num_time_steps,
                start_frequency_hz: START_FREQUENCY_HZ,
                frequency_inc_hz: FREQUENCY_INC_HZ,
                num_channels: scale.num_channels,
            },
            telescope: telescope.clone(),
            interferometer: InterferometerConfig {
                channel_bandwidth_hz: CHANNEL_BANDWIDTH_HZ,
                time_average_sec: TIME_AVERAGE_SEC,
                max_time_samples_per_block: MAX_TIME_SAMPLES_PER_BLOCK,
                ms_filename: ms_filename(&scale.name),
                vis_filename: vis_filename(&scale.name),
            },
        })
    }

    /// The visibility file this simulation will write.
    pub fn vis_filename(&self) -> &Path {
        &self.interferometer.vis_filename
    }

    /// Get the settings tree handed to `oskar_sim_interferometer`.
    pub fn to_settings(&self) -> SettingsTree {
        let SimulationConfig {
            name: _,
            max_sources_per_chunk,
            observation:
                ObservationConfig {
                    phase_centre,
                    start_time,
                    length_sec,
                    num_time_steps,
                    start_frequency_hz,
                    frequency_inc_hz,
                    num_channels,
                },
            telescope:
                Telescope {
                    input_directory,
                    pol_mode,
                },
            interferometer:
                InterferometerConfig {
                    channel_bandwidth_hz,
                    time_average_sec,
                    max_time_samples_per_block,
                    ms_filename,
                    vis_filename,
                },
        } = self;

        let mut s = SettingsTree::new(OSKAR_SIM_INTERFEROMETER);
        s.set(
            "simulator/max_sources_per_chunk",
            max_sources_per_chunk.to_string(),
        );
        s.set("observation/length", float_value(*length_sec));
        s.set("observation/num_time_steps", num_time_steps.to_string());
        s.set("observation/start_frequency_hz", float_value(*start_frequency_hz));
        s.set("observation/frequency_inc_hz", float_value(*frequency_inc_hz));
        s.set("observation/num_channels", num_channels.to_string());
        s.set(
            "observation/phase_centre_ra_deg",
            float_value(phase_centre.ra_deg),
        );
        s.set(
            "observation/phase_centre_dec_deg",
            float_value(phase_centre.dec_deg),
        );
        s.set("observation/start_time_utc", format_utc(*start_time));
        s.set(
            "telescope/input_directory",
            input_directory.display().to_string(),
        );
        s.set("telescope/pol_mode", pol_mode.to_string());
        s.set(
            "interferometer/channel_bandwidth_hz",
            float_value(*channel_bandwidth_hz),
        );
        s.set(
            "interferometer/time_average_sec",
            float_value(*time_average_sec),
        );
        s.set(
            "interferometer/max_time_samples_per_block",
            max_time_samples_per_block.to_string(),
        );
        s.set("interferometer/ms_filename", ms_filename.display().to_string());
        s.set(
            "interferometer/oskar_vis_filename",
            vis_filename.display().to_string(),
        );
        s
    }
}

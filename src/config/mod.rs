// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-scale configuration of the simulation and imaging engines.
//!
//! A [`ScaleSpec`] holds the handful of numbers that distinguish one scale
//! from another. Everything else is derived from it (and the campaign's
//! [`Pointing`]) by [`SimulationConfig::new`] and [`ImagingConfig::new`].
//! These typed configs are only turned into string settings when they are
//! given to an engine.

mod error;
mod imaging;
mod simulation;

pub use error::ConfigError;
pub(crate) use imaging::IMAGING_ALGORITHMS_COMMA_SEPARATED;
pub use imaging::{
    fft_override, FftConfig, FftOverride, ImagingAlgorithm, ImagingConfig, GPU_OVERRIDES,
};
pub(crate) use simulation::POL_MODES_COMMA_SEPARATED;
pub use simulation::{
    InterferometerConfig, ObservationConfig, PolMode, SimulationConfig, Telescope,
};

use marlu::RADec;
use serde::{Deserialize, Serialize};
use vec1::{vec1, Vec1};

/// The phase centre of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointing {
    /// \[degrees\]
    pub ra_deg: f64,

    /// \[degrees\]
    pub dec_deg: f64,
}

impl Pointing {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Pointing, ConfigError> {
        let p = Pointing { ra_deg, dec_deg };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..360.0).contains(&self.ra_deg) {
            return Err(ConfigError::RaInvalid(self.ra_deg));
        }
        if !(-90.0..=90.0).contains(&self.dec_deg) {
            return Err(ConfigError::DecInvalid(self.dec_deg));
        }
        Ok(())
    }

    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.ra_deg, self.dec_deg)
    }
}

/// The parameters that distinguish the scales of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSpec {
    /// Used in the names of every file made for this scale.
    pub name: String,

    /// Sources further than this from the phase centre are not simulated
    /// \[degrees\].
    pub max_radius_deg: f64,

    /// The length of the observation \[seconds\].
    pub length_sec: f64,

    pub num_time_steps: usize,

    pub num_channels: usize,

    /// The field of view of the images \[degrees\].
    pub fov_deg: f64,

    /// The side length of the images \[pixels\].
    pub num_pixels: usize,
}

impl ScaleSpec {
    /// Check that this scale's parameters make sense. This must pass before
    /// anything is handed to an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScaleSpec {
            name,
            max_radius_deg,
            length_sec,
            num_time_steps,
            num_channels,
            fov_deg,
            num_pixels,
        } = self;

        if name.is_empty()
            || name
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\')
        {
            return Err(ConfigError::InvalidName(name.clone()));
        }
        if !max_radius_deg.is_finite() || *max_radius_deg <= 0.0 || *max_radius_deg > 180.0 {
            return Err(ConfigError::InvalidRadius {
                name: name.clone(),
                value: *max_radius_deg,
            });
        }
        if !length_sec.is_finite() || *length_sec <= 0.0 {
            return Err(ConfigError::InvalidLength {
                name: name.clone(),
                value: *length_sec,
            });
        }
        if *num_time_steps == 0 {
            return Err(ConfigError::ZeroTimeSteps(name.clone()));
        }
        if *num_channels == 0 {
            return Err(ConfigError::ZeroChannels(name.clone()));
        }
        if !fov_deg.is_finite() || *fov_deg <= 0.0 || *fov_deg > 180.0 {
            return Err(ConfigError::InvalidFov {
                name: name.clone(),
                value: *fov_deg,
            });
        }
        if *num_pixels == 0 {
            return Err(ConfigError::ZeroPixels(name.clone()));
        }

        Ok(())
    }

    /// The large, medium and small scales, in that order.
    pub fn default_scales() -> Vec1<ScaleSpec> {
        vec1![
            ScaleSpec {
                name: "large".to_string(),
                max_radius_deg: 5.657,
                length_sec: 14400.0,
                num_time_steps: 60,
                num_channels: 4,
                fov_deg: 8.0,
                num_pixels: 16384,
            },
            ScaleSpec {
                name: "medium".to_string(),
                max_radius_deg: 2.828,
                length_sec: 3600.0,
                num_time_steps: 30,
                num_channels: 2,
                fov_deg: 4.0,
                num_pixels: 8192,
            },
            ScaleSpec {
                name: "small".to_string(),
                max_radius_deg: 0.707,
                length_sec: 900.0,
                num_time_steps: 30,
                num_channels: 1,
                fov_deg: 1.0,
                num_pixels: 2048,
            },
        ]
    }
}

/// Validate every scale and check that no two scales share a name (their
/// files would overwrite each other).
pub fn validate_scales(scales: &[ScaleSpec]) -> Result<(), ConfigError> {
    for (i, scale) in scales.iter().enumerate() {
        scale.validate()?;
        if scales[..i].iter().any(|s| s.name == scale.name) {
            return Err(ConfigError::DuplicateName(scale.name.clone()));
        }
    }
    Ok(())
}

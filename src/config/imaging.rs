// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Configuration of the imager.

use std::path::PathBuf;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{ConfigError, ScaleSpec};
use crate::{
    constants::{DEFAULT_ROOT_PREFIX, OSKAR_IMAGER},
    filenames::{image_root, vis_filename},
    settings::{bool_value, float_value, SettingsTree},
};

/// The imaging algorithms offered by the imager.
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
pub enum ImagingAlgorithm {
    #[strum(serialize = "FFT")]
    #[serde(rename = "FFT")]
    Fft,

    #[default]
    #[strum(serialize = "W-projection")]
    #[serde(rename = "W-projection")]
    WProjection,

    #[strum(serialize = "DFT 2D")]
    #[serde(rename = "DFT 2D")]
    Dft2d,

    #[strum(serialize = "DFT 3D")]
    #[serde(rename = "DFT 3D")]
    Dft3d,
}

lazy_static::lazy_static! {
    pub(crate) static ref IMAGING_ALGORITHMS_COMMA_SEPARATED: String =
        ImagingAlgorithm::iter().map(|a| format!("'{a}'")).join(", ");
}

impl ImagingAlgorithm {
    /// The image root prefix used when none is given.
    pub fn default_root_prefix(self) -> &'static str {
        match self {
            ImagingAlgorithm::Fft => "img_fft",
            ImagingAlgorithm::WProjection => DEFAULT_ROOT_PREFIX,
            ImagingAlgorithm::Dft2d => "img_dft2d",
            ImagingAlgorithm::Dft3d => "img_dft3d",
        }
    }
}

/// Whether the imager uses the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftConfig {
    pub use_gpu: bool,
    pub grid_on_gpu: bool,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            use_gpu: true,
            grid_on_gpu: true,
        }
    }
}

/// A forced change to the imager's GPU settings for one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftOverride {
    pub use_gpu: Option<bool>,
    pub grid_on_gpu: Option<bool>,

    /// Why the override exists.
    pub reason: &'static str,
}

impl FftOverride {
    fn apply(&self, fft: &mut FftConfig) {
        if let Some(use_gpu) = self.use_gpu {
            fft.use_gpu = use_gpu;
        }
        if let Some(grid_on_gpu) = self.grid_on_gpu {
            fft.grid_on_gpu = grid_on_gpu;
        }
    }
}

/// Per-scale exceptions to the default GPU settings, keyed by scale name.
///
/// This is not a general rule about big images; only the scales listed here
/// are affected.
pub const GPU_OVERRIDES: &[(&str, FftOverride)] = &[(
    "large",
    FftOverride {
        use_gpu: Some(false),
        grid_on_gpu: Some(false),
        reason: "works around a resource limitation of the imager's GPU code",
    },
)];

/// Get the GPU override for a scale, if there is one.
pub fn fft_override(name: &str) -> Option<&'static FftOverride> {
    GPU_OVERRIDES
        .iter()
        .find(|(scale_name, _)| *scale_name == name)
        .map(|(_, o)| o)
}

/// Everything the imager needs to know to image one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagingConfig {
    /// The scale this config was made for.
    pub name: String,

    /// \[pixels\]
    pub size: usize,

    /// \[degrees\]
    pub fov_deg: f64,

    pub algorithm: ImagingAlgorithm,

    pub fft: FftConfig,

    /// This is always the visibility file written when simulating the same
    /// scale.
    pub input_vis_data: PathBuf,

    pub root_path: PathBuf,
}

impl ImagingConfig {
    /// Make the imaging config for a scale. If `cpu_only` is set, the GPU is
    /// not used at all; otherwise the GPU is used unless the scale is listed
    /// in [`GPU_OVERRIDES`].
    pub fn new(
        scale: &ScaleSpec,
        algorithm: ImagingAlgorithm,
        root_prefix: &str,
        cpu_only: bool,
    ) -> Result<ImagingConfig, ConfigError> {
        scale.validate()?;
        if root_prefix.is_empty() {
            return Err(ConfigError::EmptyRootPrefix);
        }

        let mut fft = if cpu_only {
            FftConfig {
                use_gpu: false,
                grid_on_gpu: false,
            }
        } else {
            FftConfig::default()
        };
        if let Some(o) = fft_override(&scale.name) {
            o.apply(&mut fft);
        }

        Ok(ImagingConfig {
            name: scale.name.clone(),
            size: scale.num_pixels,
            fov_deg: scale.fov_deg,
            algorithm,
            fft,
            input_vis_data: vis_filename(&scale.name),
            root_path: image_root(root_prefix, &scale.name),
        })
    }

    /// Does the imager touch the GPU with this config?
    pub fn uses_gpu(&self) -> bool {
        self.fft.use_gpu || self.fft.grid_on_gpu
    }

    /// Get the settings tree handed to `oskar_imager`.
    pub fn to_settings(&self) -> SettingsTree {
        let ImagingConfig {
            name: _,
            size,
            fov_deg,
            algorithm,
            fft: FftConfig {
                use_gpu,
                grid_on_gpu,
            },
            input_vis_data,
            root_path,
        } = self;

        let mut s = SettingsTree::new(OSKAR_IMAGER);
        s.set("image/size", size.to_string());
        s.set("image/fov_deg", float_value(*fov_deg));
        s.set("image/algorithm", algorithm.to_string());
        s.set("image/fft/use_gpu", bool_value(*use_gpu));
        s.set("image/fft/grid_on_gpu", bool_value(*grid_on_gpu));
        s.set("image/input_vis_data", input_vis_data.display().to_string());
        s.set("image/root_path", root_path.display().to_string());
        s
    }
}

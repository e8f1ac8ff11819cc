// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::time::StartTimeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Right Ascension {0}° was not within 0 to 360!")]
    RaInvalid(f64),

    #[error("Declination {0}° was not within -90 to 90!")]
    DecInvalid(f64),

    #[error("Scale name '{0}' is empty or contains whitespace or path separators")]
    InvalidName(String),

    #[error("Scale name '{0}' was used more than once")]
    DuplicateName(String),

    #[error("Scale '{name}': the sky-model radius ({value}°) must be above 0 and at most 180")]
    InvalidRadius { name: String, value: f64 },

    #[error("Scale '{name}': the observation length ({value} s) must be positive")]
    InvalidLength { name: String, value: f64 },

    #[error("Scale '{0}': the number of time steps cannot be 0!")]
    ZeroTimeSteps(String),

    #[error("Scale '{0}': the number of channels cannot be 0!")]
    ZeroChannels(String),

    #[error("Scale '{name}': the field of view ({value}°) must be above 0 and at most 180")]
    InvalidFov { name: String, value: f64 },

    #[error("Scale '{0}': the number of image pixels cannot be 0!")]
    ZeroPixels(String),

    #[error("The image root prefix cannot be empty")]
    EmptyRootPrefix,

    #[error(transparent)]
    StartTime(#[from] StartTimeError),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The names of every file a campaign produces. Anything that needs to find a
//! product of another stage must go through these functions.

use std::path::PathBuf;

/// The sky model used to simulate a scale.
pub fn sky_model_filename(name: &str) -> PathBuf {
    PathBuf::from(format!("sky_{name}.txt"))
}

/// The OSKAR visibility file made by simulating a scale, and read when
/// imaging it.
pub fn vis_filename(name: &str) -> PathBuf {
    PathBuf::from(format!("sim_{name}.vis"))
}

/// The measurement set made by simulating a scale.
pub fn ms_filename(name: &str) -> PathBuf {
    PathBuf::from(format!("sim_{name}.ms"))
}

/// The root of all image products of a scale.
pub fn image_root(root_prefix: &str, name: &str) -> PathBuf {
    PathBuf::from(format!("{root_prefix}_{name}"))
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The external engines that do the actual simulating and imaging.
//!
//! Engines only ever see a [`SettingsTree`] (and, for the simulator, the sky
//! model). Each engine instance runs one job at a time; callers that want to
//! run scales concurrently ask an [`EngineProvider`] for a fresh instance per
//! scale.

mod error;
mod oskar;

pub use error::EngineError;
pub use oskar::{OskarApps, OskarImager, OskarSimulator};

use crate::{catalogue::SkyModel, settings::SettingsTree};

/// Something that can turn a sky model into visibilities.
pub trait Simulator: Send {
    /// Run a simulation to completion. The visibility file named in the
    /// settings must exist when this returns `Ok`.
    fn run(&mut self, settings: &SettingsTree, sky: &SkyModel) -> Result<(), EngineError>;
}

/// Something that can turn visibilities into images.
pub trait Imager: Send {
    fn run(&mut self, settings: &SettingsTree) -> Result<(), EngineError>;
}

/// Hands out engine instances.
pub trait EngineProvider: Sync {
    fn simulator(&self) -> Box<dyn Simulator + '_>;

    fn imager(&self) -> Box<dyn Imager + '_>;
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two stages each scale goes through. A stage turns a typed
//! configuration into settings and hands them to an engine; engine errors are
//! passed back untouched and nothing is retried.


use crate::{
    catalogue::SkyModel,
    config::{ImagingConfig, SimulationConfig},
    engine::{EngineError, Imager, Simulator},
    observer::{RunObserver, Stage},
};

/// Simulate visibilities of `sky` for one scale.
pub fn simulate(
    simulator: &mut dyn Simulator,
    config: &SimulationConfig,
    sky: &SkyModel,
    observer: &dyn RunObserver,
) -> Result<(), EngineError> {
    observer.stage_started(
        &config.name,
        Stage::Simulation,
        &config.vis_filename().display().to_string(),
    );
    simulator.run(&config.to_settings(), sky)?;
    observer.stage_finished(&config.name, Stage::Simulation);
    Ok(())
}

/// Image one scale's visibilities.
pub fn image(
    imager: &mut dyn Imager,
    config: &ImagingConfig,
    observer: &dyn RunObserver,
) -> Result<(), EngineError> {
    observer.stage_started(
        &config.name,
        Stage::Imaging,
        &config.root_path.display().to_string(),
    );
    imager.run(&config.to_settings())?;
    observer.stage_finished(&config.name, Stage::Imaging);
    Ok(())
}

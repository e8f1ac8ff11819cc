// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reporting what a campaign is doing.
//!
//! Components don't log their progress directly; they are handed a
//! [`RunObserver`] that lives as long as the campaign run. [`LogObserver`]
//! sends everything to the `log` facade.

use log::info;

/// The stages that each scale goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Stage {
    #[strum(serialize = "simulation")]
    Simulation,

    #[strum(serialize = "imaging")]
    Imaging,
}

pub trait RunObserver: Sync {
    /// A sky model was made by filtering the catalogue.
    fn sky_filtered(&self, name: &str, num_input: usize, num_retained: usize);

    /// A stage is about to hand over to an external engine. `target` is the
    /// main output of the stage.
    fn stage_started(&self, scale: &str, stage: Stage, target: &str);

    /// A stage's engine finished successfully.
    fn stage_finished(&self, scale: &str, stage: Stage);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn sky_filtered(&self, name: &str, num_input: usize, num_retained: usize) {
        info!("Number of sources in input sky model: {num_input}");
        info!("Number of sources in filtered sky model '{name}': {num_retained}");
    }

    fn stage_started(&self, scale: &str, stage: Stage, target: &str) {
        match stage {
            Stage::Simulation => info!("Starting simulation for \"{scale}\" ({target})"),
            Stage::Imaging => info!("Starting imager for \"{target}\""),
        }
    }

    fn stage_finished(&self, scale: &str, stage: Stage) {
        match stage {
            Stage::Simulation => info!("Simulation of \"{scale}\" complete"),
            Stage::Imaging => info!("Imaging complete"),
        }
    }
}

#[cfg(test)]
pub(crate) use recording::{Event, RecordingObserver};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Multi-scale synthetic observation campaigns for radio interferometers.

A sky catalogue is simulated with OSKAR at several angular scales (a wide,
long observation down to a narrow, short one) all sharing one phase centre,
and each scale's visibilities are then imaged.
 */

pub mod campaign;
pub mod catalogue;
mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod filenames;
pub mod observer;
pub mod settings;
pub mod stages;
pub mod time;

// Re-exports.
pub use campaign::{Campaign, CampaignError};
pub use catalogue::{Catalogue, CatalogueSource, SkyModel};
pub use cli::{Skyscale, SkyscaleError};
pub use config::{ImagingConfig, Pointing, ScaleSpec, SimulationConfig};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for sky-source catalogues and the sky models derived from them.
//!
//! A [`Catalogue`] is read once and never changed; each scale of a campaign
//! borrows it and produces its own [`SkyModel`] by keeping only the sources
//! near the phase centre.

mod error;
mod fits;
pub(crate) mod read;
#[cfg(test)]
mod tests;
pub(crate) mod write;

pub use error::*;
pub use fits::FitsError;
pub use read::{read_catalogue, CatalogueType, FitsColumns};
pub use write::{write_sky_model, write_sky_model_file};

use std::ops::Deref;

use log::{log_enabled, trace, Level::Trace};
use marlu::RADec;
use serde::{Deserialize, Serialize};

use crate::{config::Pointing, observer::RunObserver};

/// A single catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogueSource {
    /// Right ascension \[degrees\].
    pub ra_deg: f64,

    /// Declination \[degrees\].
    pub dec_deg: f64,

    /// Stokes I flux density \[Jy\].
    pub flux_jy: f64,
}

impl CatalogueSource {
    pub fn radec(&self) -> RADec {
        RADec::from_degrees(self.ra_deg, self.dec_deg)
    }

    /// The great-circle distance between this source and the pointing
    /// \[degrees\].
    pub fn separation_deg(&self, pointing: Pointing) -> f64 {
        self.radec().separation(pointing.radec()).to_degrees()
    }
}

/// All sources of a sky catalogue, brightest first.
///
/// There is deliberately no mutable access to the sources; the catalogue is
/// shared between all scales of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue(Vec<CatalogueSource>);

impl Catalogue {
    /// Make a new [`Catalogue`]. The sources are (stably) sorted by
    /// descending flux density.
    pub fn new(mut sources: Vec<CatalogueSource>) -> Self {
        sources.sort_by(|a, b| b.flux_jy.total_cmp(&a.flux_jy));
        Self(sources)
    }

    /// Get the sources within `max_radius_deg` of the pointing (inclusive)
    /// as a new sky model called `name`. Catalogue order is preserved.
    pub fn filter_by_radius(
        &self,
        name: &str,
        pointing: Pointing,
        max_radius_deg: f64,
        observer: &dyn RunObserver,
    ) -> SkyModel {
        let sources: Vec<CatalogueSource> = self
            .iter()
            .filter(|src| {
                let separation = src.separation_deg(pointing);
                let keep = (0.0..=max_radius_deg).contains(&separation);
                if !keep && log_enabled!(Trace) {
                    trace!(
                        "Source at ({}°, {}°) is too far from the phase centre ({separation}°)",
                        src.ra_deg,
                        src.dec_deg
                    );
                }
                keep
            })
            .copied()
            .collect();
        observer.sky_filtered(name, self.len(), sources.len());

        SkyModel {
            name: name.to_string(),
            sources,
        }
    }
}

impl Deref for Catalogue {
    type Target = [CatalogueSource];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<CatalogueSource> for Catalogue {
    fn from_iter<I: IntoIterator<Item = CatalogueSource>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A named subset of a [`Catalogue`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkyModel {
    pub name: String,
    pub sources: Vec<CatalogueSource>,
}

impl SkyModel {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<CatalogueSource> {
        self.sources.iter()
    }

    /// The summed flux density of all sources \[Jy\].
    pub fn total_flux_jy(&self) -> f64 {
        self.iter().map(|s| s.flux_jy).sum()
    }
}

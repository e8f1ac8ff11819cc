// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all skyscale-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{
    campaign::CampaignArgsError, common::CatalogueArgsError, sky_filter::SkyFilterArgsError,
};
use crate::{
    campaign::CampaignError,
    catalogue::{FitsError, ReadCatalogueError, WriteSkyModelError},
    config::ConfigError,
    engine::EngineError,
    time::StartTimeError,
};

/// The *only* publicly visible error from skyscale. Where it helps, messages
/// carry a suggestion.
#[derive(Error, Debug)]
pub enum SkyscaleError {
    /// An error related to the campaign arguments.
    #[error("{0}")]
    Campaign(String),

    /// An error in the parameters of a scale or the pointing.
    #[error("{0}\n\nScales are set with [[scales]] tables in an arguments file; the pointing with --ra and --dec.")]
    Config(String),

    /// An error related to start times.
    #[error("{0}")]
    StartTime(String),

    /// An error related to reading or writing catalogues and sky models.
    #[error("{0}\n\nCatalogues are text tables (RA [deg], Dec [deg], Stokes I [Jy] columns) or FITS binary tables.")]
    Catalogue(String),

    /// An error from one of the OSKAR applications.
    #[error("{0}\n\nIf OSKAR isn't in PATH, its location can be given with --oskar-bin-dir. Turning up verbosity (-vv) shows what OSKAR printed.")]
    Engine(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and check the FITS column names with --fits-columns.")]
    Cfitsio(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<CampaignArgsError> for SkyscaleError {
    fn from(e: CampaignArgsError) -> Self {
        Self::Campaign(e.to_string())
    }
}

impl From<CatalogueArgsError> for SkyscaleError {
    fn from(e: CatalogueArgsError) -> Self {
        Self::Catalogue(e.to_string())
    }
}

impl From<SkyFilterArgsError> for SkyscaleError {
    fn from(e: SkyFilterArgsError) -> Self {
        Self::Campaign(e.to_string())
    }
}

// Library code errors.

impl From<CampaignError> for SkyscaleError {
    fn from(e: CampaignError) -> Self {
        match e {
            CampaignError::Config(e) => Self::from(e),
            CampaignError::Engine { .. } => Self::Engine(e.to_string()),
            CampaignError::WriteSky { .. } => Self::Catalogue(e.to_string()),
            CampaignError::MissingVisibilities { .. }
            | CampaignError::UnknownScale(_, _)
            | CampaignError::DuplicateRootPrefix(_)
            | CampaignError::NoScales => Self::Campaign(e.to_string()),
            CampaignError::IO(e) => Self::from(e),
        }
    }
}

impl From<ConfigError> for SkyscaleError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::StartTime(e) => Self::from(e),
            _ => Self::Config(e.to_string()),
        }
    }
}

impl From<StartTimeError> for SkyscaleError {
    fn from(e: StartTimeError) -> Self {
        Self::StartTime(e.to_string())
    }
}

impl From<ReadCatalogueError> for SkyscaleError {
    fn from(e: ReadCatalogueError) -> Self {
        match e {
            ReadCatalogueError::Fits(e) => Self::from(e),
            ReadCatalogueError::IO(e) => Self::from(e),
            _ => Self::Catalogue(e.to_string()),
        }
    }
}

impl From<WriteSkyModelError> for SkyscaleError {
    fn from(e: WriteSkyModelError) -> Self {
        Self::Catalogue(e.to_string())
    }
}

impl From<EngineError> for SkyscaleError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e.to_string())
    }
}

impl From<FitsError> for SkyscaleError {
    fn from(e: FitsError) -> Self {
        Self::Cfitsio(e.to_string())
    }
}

// External crate errors.

impl From<log::SetLoggerError> for SkyscaleError {
    fn from(e: log::SetLoggerError) -> Self {
        Self::Generic(format!("Couldn't set up logging: {e}"))
    }
}

impl From<std::io::Error> for SkyscaleError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

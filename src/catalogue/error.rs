// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::{fits::FitsError, read::CATALOGUE_TYPES_COMMA_SEPARATED};

/// Errors associated with reading in a catalogue.
#[derive(Error, Debug)]
pub enum ReadCatalogueError {
    #[error("Catalogue file {0} doesn't exist")]
    DoesntExist(PathBuf),

    #[error("Couldn't work out the type of catalogue {0}; supported types: {}", *CATALOGUE_TYPES_COMMA_SEPARATED)]
    UnknownType(PathBuf),

    #[error("{file} line {line}: expected at least 3 columns (RA, Dec, flux density), got {got}")]
    TooFewColumns {
        file: PathBuf,
        line: usize,
        got: usize,
    },

    #[error("{file} line {line}: couldn't parse '{value}' as a number")]
    ParseFloat {
        file: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Catalogue error: Attempted to use RA {0}°, but this is out of range (0° <= RA < 360°)")]
    InvalidRa(f64),

    #[error("Catalogue error: Attempted to use Dec {0}°, but this is out of range (-90° <= Dec <= 90°)")]
    InvalidDec(f64),

    #[error("Catalogue error: a source at ({ra}°, {dec}°) has a non-finite flux density")]
    InvalidFlux { ra: f64, dec: f64 },

    #[error("FITS catalogue columns have different lengths (RA: {ra}, Dec: {dec}, flux: {flux})")]
    ColumnLengths { ra: usize, dec: usize, flux: usize },

    #[error("The catalogue {0} contains no sources")]
    NoSources(PathBuf),

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// Errors associated with writing out a sky model.
#[derive(Error, Debug)]
pub enum WriteSkyModelError {
    #[error("Couldn't create sky-model file {file}: {err}")]
    Create { file: PathBuf, err: std::io::Error },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

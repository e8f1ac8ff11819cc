// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading catalogues.
//!
//! Two kinds of catalogue are supported: text tables in the style of OSKAR sky
//! models (RA, Dec and Stokes I as the first three columns; any further
//! columns are ignored), and FITS binary tables like the GLEAM extragalactic
//! catalogue.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{
    fits::{fits_open, fits_open_hdu, fits_read_f64_col},
    Catalogue, CatalogueSource, ReadCatalogueError,
};
use crate::constants::{DEFAULT_FITS_DEC_COL, DEFAULT_FITS_FLUX_COL, DEFAULT_FITS_RA_COL};

/// All of the supported catalogue types, keyed by file extension.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum CatalogueType {
    #[strum(to_string = "txt", serialize = "osm")]
    Text,

    #[strum(to_string = "fits", serialize = "fit")]
    Fits,
}

lazy_static::lazy_static! {
    pub(crate) static ref CATALOGUE_TYPES_COMMA_SEPARATED: String = CatalogueType::iter().join(", ");
}

impl CatalogueType {
    /// Guess the type of a catalogue from its extension (case insensitive).
    pub fn from_path(path: &Path) -> Option<CatalogueType> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| CatalogueType::from_str(&e).ok())
    }
}

/// Where to find catalogue columns in a FITS binary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitsColumns {
    /// The zero-indexed HDU containing the table.
    pub hdu: usize,
    pub ra: String,
    pub dec: String,
    pub flux: String,
}

impl Default for FitsColumns {
    fn default() -> Self {
        Self {
            hdu: 1,
            ra: DEFAULT_FITS_RA_COL.to_string(),
            dec: DEFAULT_FITS_DEC_COL.to_string(),
            flux: DEFAULT_FITS_FLUX_COL.to_string(),
        }
    }
}

/// Read a catalogue file. If the type isn't given, it is guessed from the
/// file extension.
pub fn read_catalogue(
    file: &Path,
    catalogue_type: Option<CatalogueType>,
    fits_columns: &FitsColumns,
) -> Result<Catalogue, ReadCatalogueError> {
    if !file.exists() {
        return Err(ReadCatalogueError::DoesntExist(file.to_path_buf()));
    }
    let catalogue_type = catalogue_type
        .or_else(|| CatalogueType::from_path(file))
        .ok_or_else(|| ReadCatalogueError::UnknownType(file.to_path_buf()))?;
    debug!("Reading {} as a {catalogue_type} catalogue", file.display());

    let sources = match catalogue_type {
        CatalogueType::Text => read_text(file)?,
        CatalogueType::Fits => read_fits(file, fits_columns)?,
    };
    if sources.is_empty() {
        return Err(ReadCatalogueError::NoSources(file.to_path_buf()));
    }
    info!("Read {} sources from {}", sources.len(), file.display());

    Ok(Catalogue::new(sources))
}

fn read_text(file: &Path) -> Result<Vec<CatalogueSource>, ReadCatalogueError> {
    let reader = BufReader::new(File::open(file)?);
    parse_text(reader, file)
}

/// Parse a text catalogue. Columns may be separated by whitespace and/or
/// commas; empty lines and lines starting with '#' are skipped.
pub(super) fn parse_text<R: BufRead>(
    reader: R,
    file: &Path,
) -> Result<Vec<CatalogueSource>, ReadCatalogueError> {
    let mut sources = vec![];
    for (i_line, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        if columns.len() < 3 {
            return Err(ReadCatalogueError::TooFewColumns {
                file: file.to_path_buf(),
                line: i_line + 1,
                got: columns.len(),
            });
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| ReadCatalogueError::ParseFloat {
                    file: file.to_path_buf(),
                    line: i_line + 1,
                    value: s.to_string(),
                })
        };
        sources.push(new_source(
            parse(columns[0])?,
            parse(columns[1])?,
            parse(columns[2])?,
        )?);
    }

    Ok(sources)
}

fn read_fits(
    file: &Path,
    columns: &FitsColumns,
) -> Result<Vec<CatalogueSource>, ReadCatalogueError> {
    let mut fptr = fits_open(file)?;
    let hdu = fits_open_hdu(&mut fptr, file, columns.hdu)?;
    let ras = fits_read_f64_col(&mut fptr, file, &hdu, &columns.ra)?;
    let decs = fits_read_f64_col(&mut fptr, file, &hdu, &columns.dec)?;
    let fluxes = fits_read_f64_col(&mut fptr, file, &hdu, &columns.flux)?;
    if ras.len() != decs.len() || ras.len() != fluxes.len() {
        return Err(ReadCatalogueError::ColumnLengths {
            ra: ras.len(),
            dec: decs.len(),
            flux: fluxes.len(),
        });
    }

    ras.into_iter()
        .zip(decs)
        .zip(fluxes)
        .map(|((ra, dec), flux)| new_source(ra, dec, flux))
        .collect()
}

/// Verify that the values are sensible before making a source.
fn new_source(ra_deg: f64, dec_deg: f64, flux_jy: f64) -> Result<CatalogueSource, ReadCatalogueError> {
    if !(0.0..360.0).contains(&ra_deg) {
        return Err(ReadCatalogueError::InvalidRa(ra_deg));
    }
    if !(-90.0..=90.0).contains(&dec_deg) {
        return Err(ReadCatalogueError::InvalidDec(dec_deg));
    }
    if !flux_jy.is_finite() {
        return Err(ReadCatalogueError::InvalidFlux {
            ra: ra_deg,
            dec: dec_deg,
        });
    }

    Ok(CatalogueSource {
        ra_deg,
        dec_deg,
        flux_jy,
    })
}

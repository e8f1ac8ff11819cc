// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. e.g. the `run` and
//! `sky-filter` subcommands both read a catalogue, so the same catalogue
//! arguments are shared between them.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    catalogue::{
        read::CATALOGUE_TYPES_COMMA_SEPARATED, read_catalogue, Catalogue, CatalogueType,
        FitsColumns,
    },
    constants::{DEFAULT_FITS_DEC_COL, DEFAULT_FITS_FLUX_COL, DEFAULT_FITS_RA_COL},
    SkyscaleError,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref CATALOGUE_TYPE_HELP: String =
        format!("The type of the catalogue. Valid types are: {}. If not specified, the type is guessed from the file extension", *CATALOGUE_TYPES_COMMA_SEPARATED);

    static ref FITS_COLUMNS_HELP: String =
        format!("The names of the RA, Dec and flux-density columns in a FITS catalogue. Default: {DEFAULT_FITS_RA_COL} {DEFAULT_FITS_DEC_COL} {DEFAULT_FITS_FLUX_COL}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SkyscaleError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SkyscaleError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(SkyscaleError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CatalogueArgs {
    /// Path to the sky catalogue. Text catalogues have RA [deg], Dec [deg]
    /// and Stokes I [Jy] as their first three columns.
    #[clap(short, long, parse(from_str), help_heading = "CATALOGUE")]
    pub(super) catalogue: Option<PathBuf>,

    #[clap(long, help = CATALOGUE_TYPE_HELP.as_str(), help_heading = "CATALOGUE")]
    pub(super) catalogue_type: Option<String>,

    #[clap(
        long,
        help = FITS_COLUMNS_HELP.as_str(),
        help_heading = "CATALOGUE",
        number_of_values = 3,
        value_names = &["RA", "DEC", "FLUX"]
    )]
    pub(super) fits_columns: Option<Vec<String>>,

    /// The zero-indexed HDU holding the table of a FITS catalogue.
    /// Default: 1
    #[clap(long, help_heading = "CATALOGUE")]
    pub(super) fits_hdu: Option<usize>,
}

/// A catalogue that has been located but not yet read.
#[derive(Debug, Clone)]
pub(super) struct CatalogueFile {
    pub(super) file: PathBuf,
    pub(super) catalogue_type: Option<CatalogueType>,
    pub(super) fits_columns: FitsColumns,
}

impl CatalogueFile {
    pub(super) fn read(&self) -> Result<Catalogue, SkyscaleError> {
        Ok(read_catalogue(&self.file, self.catalogue_type, &self.fits_columns)?)
    }
}

impl CatalogueArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            catalogue: self.catalogue.or(other.catalogue),
            catalogue_type: self.catalogue_type.or(other.catalogue_type),
            fits_columns: self.fits_columns.or(other.fits_columns),
            fits_hdu: self.fits_hdu.or(other.fits_hdu),
        }
    }

    /// Was anything about a catalogue specified?
    pub(super) fn is_empty(&self) -> bool {
        let CatalogueArgs {
            catalogue,
            catalogue_type,
            fits_columns,
            fits_hdu,
        } = self;
        catalogue.is_none()
            && catalogue_type.is_none()
            && fits_columns.is_none()
            && fits_hdu.is_none()
    }

    pub(super) fn parse(self) -> Result<CatalogueFile, CatalogueArgsError> {
        let CatalogueArgs {
            catalogue,
            catalogue_type,
            fits_columns,
            fits_hdu,
        } = self;

        let file = catalogue.ok_or(CatalogueArgsError::NoCatalogue)?;
        let catalogue_type = catalogue_type
            .map(|t| {
                CatalogueType::from_str(&t.to_lowercase())
                    .map_err(|_| CatalogueArgsError::InvalidCatalogueType(t))
            })
            .transpose()?;

        let mut columns = FitsColumns::default();
        if let Some(names) = fits_columns {
            match names.as_slice() {
                [ra, dec, flux] => {
                    columns.ra = ra.clone();
                    columns.dec = dec.clone();
                    columns.flux = flux.clone();
                }
                _ => return Err(CatalogueArgsError::FitsColumnCount(names.len())),
            }
        }
        if let Some(hdu) = fits_hdu {
            columns.hdu = hdu;
        }
        debug!("FITS catalogue columns: {columns:?}");

        Ok(CatalogueFile {
            file,
            catalogue_type,
            fits_columns: columns,
        })
    }
}

#[derive(Error, Debug)]
pub(super) enum CatalogueArgsError {
    #[error("No catalogue was supplied; use --catalogue")]
    NoCatalogue,

    #[error("Catalogue type '{0}' isn't recognised; valid types are: {}", *CATALOGUE_TYPES_COMMA_SEPARATED)]
    InvalidCatalogueType(String),

    #[error("Expected 3 FITS column names (RA, Dec and flux density), but got {0}")]
    FitsColumnCount(usize),
}

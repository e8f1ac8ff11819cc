// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions for reading FITS catalogues.

use std::path::{Path, PathBuf};

use fitsio::{hdu::FitsHdu, FitsFile};
use thiserror::Error;

/// Open a fits file.
#[track_caller]
pub(super) fn fits_open(file: &Path) -> Result<FitsFile, FitsError> {
    FitsFile::open(file).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Open {
            fits_error: Box::new(e),
            fits_filename: file.to_path_buf(),
            source_file: caller.file(),
            source_line: caller.line(),
        }
    })
}

/// Open a fits file's HDU. `hdu_num` is zero indexed.
#[track_caller]
pub(super) fn fits_open_hdu(
    fptr: &mut FitsFile,
    file: &Path,
    hdu_num: usize,
) -> Result<FitsHdu, FitsError> {
    fptr.hdu(hdu_num).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Fitsio {
            fits_error: Box::new(e),
            fits_filename: file.to_path_buf(),
            hdu_description: format!("{}", hdu_num + 1),
            source_file: caller.file(),
            source_line: caller.line(),
        }
    })
}

/// Read a whole table column as double-precision floats. cfitsio converts
/// single-precision columns for us.
#[track_caller]
pub(super) fn fits_read_f64_col(
    fptr: &mut FitsFile,
    file: &Path,
    hdu: &FitsHdu,
    col_name: &str,
) -> Result<Vec<f64>, FitsError> {
    hdu.read_col(fptr, col_name).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Column {
            fits_error: Box::new(e),
            fits_filename: file.to_path_buf(),
            col_name: col_name.to_string(),
            source_file: caller.file(),
            source_line: caller.line(),
        }
    })
}

#[derive(Error, Debug)]
pub enum FitsError {
    /// Error when opening a fits file.
    #[error("{source_file}:{source_line}: Couldn't open {}: {fits_error}", fits_filename.display())]
    Open {
        fits_error: Box<fitsio::errors::Error>,
        fits_filename: PathBuf,
        source_file: &'static str,
        source_line: u32,
    },

    /// Error when reading a table column.
    #[error("{source_file}:{source_line}: {} couldn't read column '{col_name}': {fits_error}", fits_filename.display())]
    Column {
        fits_error: Box<fitsio::errors::Error>,
        fits_filename: PathBuf,
        col_name: String,
        source_file: &'static str,
        source_line: u32,
    },

    /// A generic error associated with the fitsio crate.
    #[error("{source_file}:{source_line}: {} HDU '{hdu_description}': {fits_error}", fits_filename.display())]
    Fitsio {
        fits_error: Box<fitsio::errors::Error>,
        fits_filename: PathBuf,
        hdu_description: String,
        source_file: &'static str,
        source_line: u32,
    },
}

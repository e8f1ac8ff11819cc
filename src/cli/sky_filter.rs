// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Write the catalogue sources near a pointing as a sky model.

use std::path::PathBuf;

use clap::Parser;
use log::info;
use thiserror::Error;

use super::common::{CatalogueArgs, InfoPrinter};
use crate::{
    catalogue::write_sky_model_file,
    config::Pointing,
    constants::{DEFAULT_DEC_DEG, DEFAULT_RA_DEG},
    observer::LogObserver,
    SkyscaleError,
};

#[derive(Parser, Debug, Clone)]
pub(super) struct SkyFilterArgs {
    #[clap(flatten)]
    catalogue_args: CatalogueArgs,

    /// The right ascension of the phase centre [degrees]. Default: 60
    #[clap(short, long)]
    ra: Option<f64>,

    /// The declination of the phase centre [degrees]. Default: -30
    #[clap(short, long, allow_hyphen_values = true)]
    dec: Option<f64>,

    /// Sources further than this from the phase centre are dropped
    /// [degrees].
    #[clap(long)]
    radius: f64,

    /// The name of the sky model, used in log messages. Default: the
    /// output file's stem
    #[clap(short, long)]
    name: Option<String>,

    /// Path to the output sky model.
    #[clap(short, long)]
    output: PathBuf,
}

impl SkyFilterArgs {
    pub(super) fn run(self, dry_run: bool) -> Result<(), SkyscaleError> {
        let SkyFilterArgs {
            catalogue_args,
            ra,
            dec,
            radius,
            name,
            output,
        } = self;

        let pointing = Pointing::new(
            ra.unwrap_or(DEFAULT_RA_DEG),
            dec.unwrap_or(DEFAULT_DEC_DEG),
        )?;
        if !radius.is_finite() || radius <= 0.0 || radius > 180.0 {
            return Err(SkyFilterArgsError::InvalidRadius(radius).into());
        }
        let name = name
            .or_else(|| {
                output
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .ok_or_else(|| SkyFilterArgsError::NoName(output.clone()))?;
        let catalogue_file = catalogue_args.parse()?;

        let mut printer = InfoPrinter::new(format!("Sky model '{name}'").into());
        printer.push_line(format!("Catalogue: {}", catalogue_file.file.display()).into());
        printer.push_line(
            format!(
                "Sources within {radius}° of ({}°, {}°)",
                pointing.ra_deg, pointing.dec_deg
            )
            .into(),
        );
        printer.push_line(format!("Output: {}", output.display()).into());
        printer.display();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        let catalogue = catalogue_file.read()?;
        let sky = catalogue.filter_by_radius(&name, pointing, radius, &LogObserver);
        write_sky_model_file(&output, &sky)?;
        info!(
            "Wrote {} sources ({:.3} Jy) to {}",
            sky.len(),
            sky.total_flux_jy(),
            output.display()
        );

        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum SkyFilterArgsError {
    #[error("The radius ({0}°) must be above 0 and at most 180")]
    InvalidRadius(f64),

    #[error("Couldn't get a sky-model name from {0}; use --name")]
    NoName(PathBuf),
}

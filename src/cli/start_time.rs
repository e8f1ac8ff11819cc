// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Print the start times of observations centred on a transit.

use clap::Parser;
use hifitime::{Duration, Epoch};

use super::common::InfoPrinter;
use crate::{
    config::ScaleSpec,
    constants::{DEFAULT_RA_DEG, SITE_LATITUDE_DEG, SITE_LONGITUDE_DEG},
    time::{compute_start_time, format_utc, hour_angle_hours},
    SkyscaleError,
};

#[derive(Parser, Debug, Clone, Default)]
pub(super) struct StartTimeArgs {
    /// The right ascension of the phase centre [degrees]. Default: 60
    #[clap(short, long)]
    ra: Option<f64>,

    /// The length of the observation [seconds]. If not specified, the start
    /// time of every default scale is shown.
    #[clap(short, long)]
    length: Option<f64>,
}

impl StartTimeArgs {
    pub(super) fn run(self) -> Result<(), SkyscaleError> {
        let ra = self.ra.unwrap_or(DEFAULT_RA_DEG);
        let lengths: Vec<(Option<String>, f64)> = match self.length {
            Some(l) => vec![(None, l)],
            None => ScaleSpec::default_scales()
                .into_iter()
                .map(|s| (Some(s.name), s.length_sec))
                .collect(),
        };

        let mut printer = InfoPrinter::new(
            format!("Observations centred on the transit of RA {ra}°").into(),
        );
        printer.push_line(
            format!("Site longitude {SITE_LONGITUDE_DEG}°, latitude {SITE_LATITUDE_DEG}°").into(),
        );
        for (name, length) in lengths {
            let start = compute_start_time(ra, length)?;
            let block = describe(name.as_deref(), ra, length, start);
            printer.push_block(block.into_iter().map(|l| l.into()).collect());
        }
        printer.display();

        Ok(())
    }
}

/// Lines describing one observation. The pointing transits between the start
/// and the end, so the hour angles have opposite signs.
fn describe(name: Option<&str>, ra: f64, length: f64, start: Epoch) -> Vec<String> {
    let end = start + Duration::from_seconds(length);
    let first = match name {
        Some(name) => format!("{name} ({length} s): start {} UTC", format_utc(start)),
        None => format!("{length} s: start {} UTC", format_utc(start)),
    };
    vec![
        first,
        format!(
            "hour angle {:+.4} h at the start, {:+.4} h at the end",
            hour_angle_hours(ra, start),
            hour_angle_hours(ra, end)
        ),
    ]
}

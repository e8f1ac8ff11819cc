// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions around time.
//!
//! Observations are scheduled so that the phase centre transits the local
//! meridian of a fixed site half-way through the observation. All times are
//! relative to a fixed reference instant (2000-01-01 00:00:00 UTC).


use hifitime::{Duration, Epoch};
use marlu::precession::get_lmst;
use thiserror::Error;

use crate::constants::{REFERENCE_DUT1_SEC, SITE_LONGITUDE_DEG};

/// The number of seconds in an hour.
const HOUR_SEC: f64 = 3600.0;

/// The instant that all start times are derived from.
pub fn reference_epoch() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2000, 1, 1)
}

/// Get the apparent local sidereal time at the site for the given instant
/// \[hours\]. UT1 - UTC is taken to be its value at the reference instant,
/// which drifts by well under a millisecond over the few days of any
/// schedule.
///
/// The mean sidereal time comes from `marlu`; the equation of the equinoxes
/// is added on top using the dominant terms of the IAU 1980 nutation series,
/// which is accurate to well under a millisecond of time.
pub fn apparent_lst_hours(epoch: Epoch) -> f64 {
    let lmst_rad = get_lmst(SITE_LONGITUDE_DEG.to_radians(), epoch, dut1());
    let lst_hours = lmst_rad.to_degrees() / 15.0 + equation_of_equinoxes_hours(epoch);
    lst_hours.rem_euclid(24.0)
}

fn dut1() -> Duration {
    Duration::from_seconds(REFERENCE_DUT1_SEC)
}

/// Nutation in longitude multiplied by the cosine of the obliquity \[hours\].
fn equation_of_equinoxes_hours(epoch: Epoch) -> f64 {
    // Julian centuries since J2000.0.
    let t = (epoch.to_jde_utc_days() - 2_451_545.0) / 36525.0;

    let omega = (125.04452 - 1934.136261 * t).to_radians();
    let sun_long = (280.4665 + 36000.7698 * t).to_radians();
    let moon_long = (218.3165 + 481267.8813 * t).to_radians();
    let obliquity = (23.439291 - 0.0130042 * t).to_radians();

    // [arcseconds]
    let nutation_long = -17.20 * omega.sin() - 1.32 * (2.0 * sun_long).sin()
        - 0.23 * (2.0 * moon_long).sin()
        + 0.21 * (2.0 * omega).sin();

    nutation_long * obliquity.cos() / (15.0 * HOUR_SEC)
}

/// Get the optimal start time of an observation of `length_sec` seconds
/// centred on `ra0_deg`.
///
/// The pointing transits the site's meridian after the reference instant;
/// the observation is placed so that its midpoint is on that transit.
pub fn compute_start_time(ra0_deg: f64, length_sec: f64) -> Result<Epoch, StartTimeError> {
    if !ra0_deg.is_finite() || !(0.0..360.0).contains(&ra0_deg) {
        return Err(StartTimeError::InvalidRa(ra0_deg));
    }
    if !length_sec.is_finite() || length_sec <= 0.0 {
        return Err(StartTimeError::InvalidLength(length_sec));
    }

    let reference = reference_epoch();
    let delta_hours = 24.0 - apparent_lst_hours(reference) + ra0_deg / 15.0;
    Ok(reference + Duration::from_seconds(delta_hours * HOUR_SEC - length_sec / 2.0))
}

/// The hour angle of `ra_deg` as seen from the site at `epoch`, wrapped to
/// \[-12, 12) \[hours\]. Negative before transit, positive after.
pub fn hour_angle_hours(ra_deg: f64, epoch: Epoch) -> f64 {
    (apparent_lst_hours(epoch) - ra_deg / 15.0 + 12.0).rem_euclid(24.0) - 12.0
}

/// Render an [`Epoch`] the way the simulator expects `start_time_utc`, i.e.
/// `YYYY-MM-DD HH:MM:SS.mmm`. Sub-millisecond parts are truncated.
pub fn format_utc(epoch: Epoch) -> String {
    let (y, mo, d, h, mi, s, ns) = epoch.to_gregorian_utc();
    format!(
        "{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}.{:03}",
        ns / 1_000_000
    )
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StartTimeError {
    #[error("Right Ascension {0}° was not within 0 to 360!")]
    InvalidRa(f64),

    #[error("Observation length {0} s must be positive!")]
    InvalidLength(f64),
}

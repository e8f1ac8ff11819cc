// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Anything handed to the external
engines is stringified from these values without any loss of precision.
 */

/// The longitude of the site used to derive observation start times
/// \[degrees\].
pub const SITE_LONGITUDE_DEG: f64 = 116.764;

/// The latitude of the site used to derive observation start times
/// \[degrees\].
pub const SITE_LATITUDE_DEG: f64 = 0.0;

/// UT1 - UTC at the reference instant (2000-01-01 00:00 UTC), from IERS
/// Bulletin B \[seconds\].
pub const REFERENCE_DUT1_SEC: f64 = 0.3554779;

/// The maximum number of sky-model sources the simulator processes at once.
pub const MAX_SOURCES_PER_CHUNK: usize = 2000;

/// The frequency of the first simulated channel \[Hz\].
pub const START_FREQUENCY_HZ: f64 = 140e6;

/// The separation between simulated channels \[Hz\].
pub const FREQUENCY_INC_HZ: f64 = 1e6;

/// The bandwidth of each simulated channel \[Hz\].
pub const CHANNEL_BANDWIDTH_HZ: f64 = 100e3;

/// The time-averaging applied to each simulated sample \[seconds\].
pub const TIME_AVERAGE_SEC: f64 = 1.0;

/// The number of time samples the simulator processes per block.
pub const MAX_TIME_SAMPLES_PER_BLOCK: usize = 4;

/// The telescope model used when one isn't specified.
pub const DEFAULT_TELESCOPE_DIR: &str = "SKA1-LOW_SKO-0000422_Rev3_38m.tm";

/// The phase centre shared by all scales of the default campaign \[degrees\].
pub const DEFAULT_RA_DEG: f64 = 60.0;
pub const DEFAULT_DEC_DEG: f64 = -30.0;

/// The prefix of image products made with W-projection in the default
/// campaign.
pub const DEFAULT_ROOT_PREFIX: &str = "img_wproj";

/// The FITS catalogue columns holding source positions and flux densities
/// (GLEAM extragalactic catalogue, Hurley-Walker et al. 2017).
pub const DEFAULT_FITS_RA_COL: &str = "RAJ2000";
pub const DEFAULT_FITS_DEC_COL: &str = "DEJ2000";
pub const DEFAULT_FITS_FLUX_COL: &str = "peak_flux_wide";

/// The names of the OSKAR applications driven by this crate.
pub const OSKAR_SIM_INTERFEROMETER: &str = "oskar_sim_interferometer";
pub const OSKAR_IMAGER: &str = "oskar_imager";

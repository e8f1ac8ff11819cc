// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing sky models as OSKAR-style text tables.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;

use super::{SkyModel, WriteSkyModelError};

/// Write a sky model. Numbers are written with as many digits as are needed
/// to read them back exactly.
pub fn write_sky_model<T: Write>(buf: &mut T, sky: &SkyModel) -> Result<(), WriteSkyModelError> {
    writeln!(buf, "# Sky model \"{}\": {} sources", sky.name, sky.len())?;
    writeln!(buf, "# RA (deg), Dec (deg), I (Jy)")?;
    for src in sky.iter() {
        writeln!(buf, "{} {} {}", src.ra_deg, src.dec_deg, src.flux_jy)?;
    }
    buf.flush()?;
    Ok(())
}

/// Write a sky model to a new file, replacing any existing file.
pub fn write_sky_model_file(file: &Path, sky: &SkyModel) -> Result<(), WriteSkyModelError> {
    debug!("Writing sky model '{}' to {}", sky.name, file.display());
    let f = File::create(file).map_err(|err| WriteSkyModelError::Create {
        file: file.to_path_buf(),
        err,
    })?;
    let mut buf = BufWriter::new(f);
    write_sky_model(&mut buf, sky)
}

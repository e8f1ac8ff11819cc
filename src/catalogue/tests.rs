// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    io::{Cursor, Write},
    path::Path,
};

use approx::assert_abs_diff_eq;
use indoc::indoc;
use fitsio::{
    tables::{ColumnDataType, ColumnDescription},
    FitsFile,
};
use tempfile::{NamedTempFile, TempDir};

use super::{read::parse_text, *};
use crate::observer::{Event, LogObserver, RecordingObserver};

fn pointing() -> Pointing {
    Pointing::new(60.0, -30.0).unwrap()
}

fn src(ra_deg: f64, dec_deg: f64, flux_jy: f64) -> CatalogueSource {
    CatalogueSource {
        ra_deg,
        dec_deg,
        flux_jy,
    }
}

/// Sources along the declination axis through the pointing, at known
/// separations.
fn test_catalogue() -> Catalogue {
    Catalogue::new(vec![
        src(60.0, -30.0, 1.0),
        src(60.0, -30.5, 2.0),
        src(60.0, -31.0, 3.0),
        src(60.0, -33.0, 4.0),
        src(60.0, -40.0, 5.0),
        src(240.0, 30.0, 6.0),
    ])
}

#[test]
fn test_catalogue_sorted_by_flux() {
    let cat = test_catalogue();
    let fluxes: Vec<f64> = cat.iter().map(|s| s.flux_jy).collect();
    assert_eq!(fluxes, [6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);

    // Equal fluxes keep their order.
    let cat = Catalogue::new(vec![src(1.0, 0.0, 1.0), src(2.0, 0.0, 1.0), src(3.0, 0.0, 2.0)]);
    let ras: Vec<f64> = cat.iter().map(|s| s.ra_deg).collect();
    assert_eq!(ras, [3.0, 1.0, 2.0]);
}

#[test]
fn test_separation() {
    assert_abs_diff_eq!(src(60.0, -30.0, 1.0).separation_deg(pointing()), 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(src(60.0, -31.0, 1.0).separation_deg(pointing()), 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(src(60.0, -40.0, 1.0).separation_deg(pointing()), 10.0, epsilon = 1e-10);
}

#[test]
fn test_filter_by_radius() {
    let cat = test_catalogue();
    let observer = RecordingObserver::default();

    let sky = cat.filter_by_radius("small", pointing(), 0.707, &observer);
    assert_eq!(sky.name, "small");
    assert_eq!(sky.sources, [src(60.0, -30.5, 2.0), src(60.0, -30.0, 1.0)]);
    assert_abs_diff_eq!(sky.total_flux_jy(), 3.0);

    let sky = cat.filter_by_radius("large", pointing(), 5.657, &observer);
    assert_eq!(sky.len(), 4);
    for s in sky.iter() {
        assert!(s.separation_deg(pointing()) <= 5.657);
    }

    // Only the source on the other side of the sky is left out.
    let sky = cat.filter_by_radius("wide", pointing(), 90.0, &observer);
    assert_eq!(sky.sources, cat[1..].to_vec());

    // A source exactly on the radius is kept.
    let radius = src(60.0, -33.0, 4.0).separation_deg(pointing());
    let sky = cat.filter_by_radius("edge", pointing(), radius, &observer);
    assert_eq!(sky.len(), 4);
    assert_eq!(sky.sources[0], src(60.0, -33.0, 4.0));

    assert_eq!(
        observer.events(),
        [
            Event::Filtered {
                name: "small".to_string(),
                num_input: 6,
                num_retained: 2
            },
            Event::Filtered {
                name: "large".to_string(),
                num_input: 6,
                num_retained: 4
            },
            Event::Filtered {
                name: "wide".to_string(),
                num_input: 6,
                num_retained: 5
            },
            Event::Filtered {
                name: "edge".to_string(),
                num_input: 6,
                num_retained: 4
            },
        ]
    );
}

#[test]
fn test_filter_is_monotonic() {
    let cat: Catalogue = (0..36)
        .flat_map(|i| (0..9).map(move |j| src(i as f64 * 10.0, -80.0 + j as f64 * 20.0, (i * 9 + j) as f64)))
        .collect();
    let before = cat.clone();

    let radii = [0.707, 2.828, 5.657, 20.0, 90.0];
    let skies: Vec<SkyModel> = radii
        .iter()
        .map(|&r| cat.filter_by_radius("test", pointing(), r, &LogObserver))
        .collect();
    for pair in skies.windows(2) {
        assert!(pair[0].len() <= pair[1].len());
        for s in pair[0].iter() {
            assert!(pair[1].sources.contains(s));
        }
    }
    for (sky, r) in skies.iter().zip(radii) {
        for s in sky.iter() {
            assert!(s.separation_deg(pointing()) <= r);
        }
    }

    // Filtering never touches the catalogue.
    assert_eq!(cat, before);
}

#[test]
fn test_filter_empty_result() {
    let cat = Catalogue::new(vec![src(240.0, 30.0, 1.0)]);
    let sky = cat.filter_by_radius("small", pointing(), 0.707, &LogObserver);
    assert!(sky.is_empty());
    assert_abs_diff_eq!(sky.total_flux_jy(), 0.0);
}

#[test]
fn test_parse_text() {
    let contents = indoc! {"
        # RA, Dec, I
        60.0 -30.0 1.5

        61.0,-31.0,2.5, 140e6, -0.7
          62.5   -29.0   0.25   # trailing stuff
    "};
    let sources = parse_text(Cursor::new(contents), Path::new("test.txt")).unwrap();
    assert_eq!(
        sources,
        [
            src(60.0, -30.0, 1.5),
            src(61.0, -31.0, 2.5),
            src(62.5, -29.0, 0.25)
        ]
    );
}

#[test]
fn test_parse_text_errors() {
    let result = parse_text(Cursor::new("60.0 -30.0\n"), Path::new("test.txt"));
    assert!(matches!(
        result,
        Err(ReadCatalogueError::TooFewColumns { line: 1, got: 2, .. })
    ));

    let result = parse_text(Cursor::new("# header\n60.0 abc 1.0\n"), Path::new("test.txt"));
    assert!(matches!(
        result,
        Err(ReadCatalogueError::ParseFloat { line: 2, ref value, .. }) if value == "abc"
    ));

    let result = parse_text(Cursor::new("360.0 -30.0 1.0\n"), Path::new("test.txt"));
    assert!(matches!(result, Err(ReadCatalogueError::InvalidRa(_))));

    let result = parse_text(Cursor::new("60.0 -91.0 1.0\n"), Path::new("test.txt"));
    assert!(matches!(result, Err(ReadCatalogueError::InvalidDec(_))));

    let result = parse_text(Cursor::new("60.0 -30.0 nan\n"), Path::new("test.txt"));
    assert!(matches!(result, Err(ReadCatalogueError::InvalidFlux { .. })));
}

#[test]
fn test_catalogue_type_from_path() {
    assert_eq!(CatalogueType::from_path(Path::new("sky.txt")), Some(CatalogueType::Text));
    assert_eq!(CatalogueType::from_path(Path::new("sky.osm")), Some(CatalogueType::Text));
    assert_eq!(CatalogueType::from_path(Path::new("GLEAM.FITS")), Some(CatalogueType::Fits));
    assert_eq!(CatalogueType::from_path(Path::new("gleam.fit")), Some(CatalogueType::Fits));
    assert_eq!(CatalogueType::from_path(Path::new("sky.yaml")), None);
    assert_eq!(CatalogueType::from_path(Path::new("sky")), None);
}

#[test]
fn test_read_catalogue_errors() {
    let result = read_catalogue(Path::new("/does/not/exist.txt"), None, &FitsColumns::default());
    assert!(matches!(result, Err(ReadCatalogueError::DoesntExist(_))));

    let mut f = tempfile::Builder::new().suffix(".dat").tempfile().unwrap();
    writeln!(f, "60.0 -30.0 1.0").unwrap();
    let result = read_catalogue(f.path(), None, &FitsColumns::default());
    assert!(matches!(result, Err(ReadCatalogueError::UnknownType(_))));
    // An explicit type overrides the extension.
    let cat = read_catalogue(f.path(), Some(CatalogueType::Text), &FitsColumns::default()).unwrap();
    assert_eq!(cat.len(), 1);

    let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(f, "# nothing here").unwrap();
    let result = read_catalogue(f.path(), None, &FitsColumns::default());
    assert!(matches!(result, Err(ReadCatalogueError::NoSources(_))));
}

#[test]
fn test_write_sky_model() {
    let sky = SkyModel {
        name: "small".to_string(),
        sources: vec![src(60.0, -30.0, 1.5), src(60.25, -30.125, 0.1)],
    };
    let mut buf = vec![];
    write_sky_model(&mut buf, &sky).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        indoc! {r#"
            # Sky model "small": 2 sources
            # RA (deg), Dec (deg), I (Jy)
            60 -30 1.5
            60.25 -30.125 0.1
        "#}
    );
}

#[test]
fn test_written_sky_model_can_be_read() {
    let cat = test_catalogue();
    let sky = cat.filter_by_radius("medium", pointing(), 2.828, &LogObserver);

    let f = NamedTempFile::new().unwrap();
    write_sky_model_file(f.path(), &sky).unwrap();
    let read = read_catalogue(f.path(), Some(CatalogueType::Text), &FitsColumns::default()).unwrap();
    assert_eq!(read.to_vec(), sky.sources);
}

/// Write a GLEAM-like binary table to `file` in the second HDU.
fn write_fits_catalogue(file: &Path, ras: &[f64], decs: &[f64], fluxes: &[f32]) {
    let mut fptr = FitsFile::create(file).open().unwrap();
    let ra_col = ColumnDescription::new("RAJ2000")
        .with_type(ColumnDataType::Double)
        .create()
        .unwrap();
    let dec_col = ColumnDescription::new("DEJ2000")
        .with_type(ColumnDataType::Double)
        .create()
        .unwrap();
    let flux_col = ColumnDescription::new("peak_flux_wide")
        .with_type(ColumnDataType::Float)
        .create()
        .unwrap();
    let hdu = fptr
        .create_table("GLEAM", &[ra_col, dec_col, flux_col])
        .unwrap();
    hdu.write_col(&mut fptr, "RAJ2000", ras).unwrap();
    hdu.write_col(&mut fptr, "DEJ2000", decs).unwrap();
    hdu.write_col(&mut fptr, "peak_flux_wide", fluxes).unwrap();
}

#[test]
fn test_read_fits_catalogue() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("gleam.fits");
    write_fits_catalogue(
        &file,
        &[60.0, 60.5, 61.0],
        &[-30.0, -30.5, -31.0],
        &[0.5, 2.25, 1.0],
    );

    let cat = read_catalogue(&file, None, &FitsColumns::default()).unwrap();
    assert_eq!(
        cat.to_vec(),
        [
            src(60.5, -30.5, 2.25),
            src(61.0, -31.0, 1.0),
            src(60.0, -30.0, 0.5)
        ]
    );
}

#[test]
fn test_read_fits_catalogue_errors() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("gleam.fits");
    write_fits_catalogue(&file, &[60.0], &[-30.0], &[1.0]);

    let columns = FitsColumns {
        flux: "int_flux_wide".to_string(),
        ..Default::default()
    };
    let result = read_catalogue(&file, None, &columns);
    assert!(matches!(
        result,
        Err(ReadCatalogueError::Fits(FitsError::Column { ref col_name, ref fits_filename, .. }))
            if col_name == "int_flux_wide" && fits_filename == &file
    ));

    let columns = FitsColumns {
        hdu: 5,
        ..Default::default()
    };
    let result = read_catalogue(&file, None, &columns);
    assert!(matches!(
        result,
        Err(ReadCatalogueError::Fits(FitsError::Fitsio { ref hdu_description, .. }))
            if hdu_description == "6"
    ));

    let result = read_catalogue(&tmp_dir.path().join("not_fits.fits"), None, &FitsColumns::default());
    assert!(matches!(result, Err(ReadCatalogueError::DoesntExist(_))));
}

//! Gridding of scattered `(lon, lat, value)` samples onto a HEALPix map.

use std::io::BufRead;
use std::path::Path;

use tomos2n_healpix::{Nside, SphericalMap, UNSEEN};
use tracing::debug;

use crate::error::IoError;

/// One point sample; longitude and latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees, `-90..=90`.
    pub lat: f64,
    /// Sampled value.
    pub value: f64,
}

/// Parses whitespace-separated `lon lat value` rows.
///
/// Blank lines and lines starting with `#` are skipped; extra columns are
/// ignored.
///
/// # Errors
///
/// Returns [`IoError::Validation`] listing every malformed line, or
/// [`IoError::Io`] if reading fails.
pub fn parse_samples<R: BufRead>(reader: R, source: &Path) -> Result<Vec<Sample>, IoError> {
    let mut samples = Vec::new();
    let mut problems = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IoError::io(source, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 3 {
            problems.push(format!(
                "line {}: expected 3 columns, got {}",
                i + 1,
                fields.len()
            ));
            continue;
        }
        match (
            fields[0].parse::<f64>(),
            fields[1].parse::<f64>(),
            fields[2].parse::<f64>(),
        ) {
            (Ok(lon), Ok(lat), Ok(value)) if (-90.0..=90.0).contains(&lat) => {
                samples.push(Sample { lon, lat, value });
            }
            (Ok(_), Ok(lat), Ok(_)) => {
                problems.push(format!("line {}: latitude {lat} outside [-90, 90]", i + 1));
            }
            _ => problems.push(format!("line {}: unparsable number", i + 1)),
        }
    }
    if !problems.is_empty() {
        return Err(IoError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }
    Ok(samples)
}

/// Reads and parses a sample table from `path`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, otherwise
/// see [`parse_samples`].
pub fn read_samples(path: &Path) -> Result<Vec<Sample>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| IoError::io(path, e))?;
    parse_samples(std::io::BufReader::new(file), path)
}

/// Averages samples per RING pixel; pixels without samples are [`UNSEEN`].
pub fn pixelise(samples: &[Sample], nside: Nside) -> SphericalMap {
    let npix = nside.npix();
    let mut sum = vec![0.0; npix];
    let mut count = vec![0u32; npix];
    for s in samples {
        let pix = nside.lonlat2pix(s.lon, s.lat);
        sum[pix] += s.value;
        count[pix] += 1;
    }
    let mut map = SphericalMap::filled(nside, UNSEEN);
    for ((out, total), n) in map.as_mut_slice().iter_mut().zip(&sum).zip(&count) {
        if *n > 0 {
            *out = total / f64::from(*n);
        }
    }
    debug!(
        n_samples = samples.len(),
        n_unseen = map.n_unseen(),
        nside = nside.get(),
        "pixelised samples"
    );
    map
}

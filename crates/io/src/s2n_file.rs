//! Serialisation of S2N sequences.

use std::path::Path;

use tracing::debug;

use crate::error::IoError;

/// On-disk encoding of an S2N sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum S2nFormat {
    /// Packed little-endian IEEE-754 doubles, no header.
    #[default]
    Binary,
    /// One value per line in `%.18e` notation.
    Text,
}

/// Writes `values` to `path` in `format`, replacing any existing file.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be written.
pub fn write_s2n(path: &Path, values: &[f64], format: S2nFormat) -> Result<(), IoError> {
    let bytes = match format {
        S2nFormat::Binary => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        S2nFormat::Text => {
            let mut out = String::with_capacity(values.len() * 26);
            for &v in values {
                out.push_str(&format_sci(v));
                out.push('\n');
            }
            out.into_bytes()
        }
    };
    std::fs::write(path, bytes).map_err(|e| IoError::io(path, e))?;
    debug!(path = %path.display(), n = values.len(), ?format, "wrote S2N");
    Ok(())
}

/// Reads an S2N sequence written by [`write_s2n`].
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Io`] | the file cannot be read |
/// | [`IoError::Validation`] | truncated binary data or an unparsable line |
pub fn read_s2n(path: &Path, format: S2nFormat) -> Result<Vec<f64>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| IoError::io(path, e))?;
    match format {
        S2nFormat::Binary => {
            if bytes.len() % 8 != 0 {
                return Err(IoError::validation(format!(
                    "{} bytes is not a whole number of doubles",
                    bytes.len()
                )));
            }
            Ok(bytes
                .chunks_exact(8)
                .map(|chunk| {
                    let mut raw = [0u8; 8];
                    raw.copy_from_slice(chunk);
                    f64::from_le_bytes(raw)
                })
                .collect())
        }
        S2nFormat::Text => {
            let text = String::from_utf8(bytes)
                .map_err(|e| IoError::validation(format!("not UTF-8 text: {e}")))?;
            text.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    line.trim().parse::<f64>().map_err(|_| {
                        IoError::validation(format!("line {}: cannot parse '{line}'", i + 1))
                    })
                })
                .collect()
        }
    }
}

/// Formats `v` like C's `%.18e`: 18 mantissa digits and a signed,
/// at-least-two-digit exponent.
fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{v:.18e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

//! Harmonic tiling of the axisymmetric scale-discretised wavelets.
//!
//! Kernels follow the smooth `s2dw` construction: a compactly supported
//! bump is integrated into a cumulative profile `phi2_j(l)`, and each
//! wavelet kernel is the square root of the difference of consecutive
//! profiles. The squared kernels sum to one over all scales, which makes
//! synthesis the exact inverse of analysis.

use tracing::debug;

use crate::error::WaveletError;

/// Trapezoid steps used to integrate the `s2dw` bump.
const QUAD_STEPS: usize = 300;

/// Largest `j_max` a tiling may have. Dilations close to 1 imply
/// thousands of near-empty scales.
pub const MAX_J: usize = 64;

/// Largest wavelet scale for band limit `L` and dilation `B`:
/// `ceil(ln L / ln B)`.
pub fn j_max(band_limit: usize, dilation: f64) -> usize {
    ((band_limit as f64).ln() / dilation.ln()).ceil() as usize
}

/// Number of columns in a scale table: the scaling function plus every
/// wavelet scale from `j_min` to `j_max`.
///
/// # Errors
///
/// Same validation as [`AxisymTiling::new`].
pub fn n_scales(band_limit: usize, dilation: f64, j_min: usize) -> Result<usize, WaveletError> {
    validate(band_limit, dilation)?;
    let j_max = j_max(band_limit, dilation);
    if j_max > MAX_J {
        return Err(WaveletError::TooManyScales {
            j_max,
            limit: MAX_J,
        });
    }
    if j_min > j_max {
        return Err(WaveletError::NoScales { j_min, j_max });
    }
    Ok(j_max - j_min + 2)
}

fn validate(band_limit: usize, dilation: f64) -> Result<(), WaveletError> {
    if !dilation.is_finite() || dilation <= 1.0 {
        return Err(WaveletError::InvalidDilation(dilation));
    }
    if band_limit < 2 {
        return Err(WaveletError::InvalidBandLimit(band_limit));
    }
    Ok(())
}

/// Smooth bump supported on `[1/B, 1]`, divided by `k`.
fn s2dw_bump(k: f64, dilation: f64) -> f64 {
    let t = (k - 1.0 / dilation) * (2.0 * dilation / (dilation - 1.0)) - 1.0;
    (-2.0 / (1.0 - t * t)).exp() / k
}

/// Trapezoid integral of the bump over `[a, b]`; non-finite panels are
/// skipped.
fn integrate_bump(a: f64, b: f64, dilation: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let h = (b - a) / QUAD_STEPS as f64;
    (0..QUAD_STEPS)
        .map(|i| {
            let f1 = s2dw_bump(a + i as f64 * h, dilation);
            let f2 = s2dw_bump(a + (i + 1) as f64 * h, dilation);
            if f1.is_finite() && f2.is_finite() {
                (f1 + f2) * h / 2.0
            } else {
                0.0
            }
        })
        .sum()
}

/// Cumulative profiles `phi2[j][l]` for `j = 0..=j_max + 1`.
fn cumulative_profiles(band_limit: usize, dilation: f64, j_max: usize) -> Vec<Vec<f64>> {
    let norm = integrate_bump(1.0 / dilation, 1.0, dilation);
    (0..=j_max + 1)
        .map(|j| {
            let lower = dilation.powi(j as i32 - 1);
            let upper = dilation.powi(j as i32);
            (0..band_limit)
                .map(|l| {
                    let lf = l as f64;
                    if lf < lower {
                        1.0
                    } else if lf > upper {
                        0.0
                    } else {
                        integrate_bump(lf / upper, 1.0, dilation) / norm
                    }
                })
                .collect()
        })
        .collect()
}

/// Axisymmetric wavelet kernels for one `(L, B, J_min)` triple.
///
/// Column 0 is the scaling function; column `c >= 1` is wavelet scale
/// `j = j_min + c - 1`.
///
/// # Example
///
/// ```
/// use tomos2n_wavelet::AxisymTiling;
///
/// let tiling = AxisymTiling::new(35, 1.5, 2)?;
/// assert_eq!(tiling.j_max(), 9);
/// assert_eq!(tiling.n_scales(), 9);
/// # Ok::<(), tomos2n_wavelet::WaveletError>(())
/// ```
#[derive(Clone, Debug)]
pub struct AxisymTiling {
    band_limit: usize,
    dilation: f64,
    j_min: usize,
    j_max: usize,
    /// `kernels[c][l]`, one row per column of the scale table.
    kernels: Vec<Vec<f64>>,
}

impl AxisymTiling {
    /// Builds the kernels.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidDilation`] | `B` not finite or `B <= 1` |
    /// | [`WaveletError::InvalidBandLimit`] | `L < 2` |
    /// | [`WaveletError::TooManyScales`] | `j_max(L, B) > MAX_J` |
    /// | [`WaveletError::NoScales`] | `j_min > j_max(L, B)` |
    pub fn new(band_limit: usize, dilation: f64, j_min: usize) -> Result<Self, WaveletError> {
        let n_scales = n_scales(band_limit, dilation, j_min)?;
        let j_max = j_max(band_limit, dilation);
        let phi2 = cumulative_profiles(band_limit, dilation, j_max);

        let mut kernels = Vec::with_capacity(n_scales);
        kernels.push(phi2[j_min].iter().map(|v| v.sqrt()).collect());
        for j in j_min..=j_max {
            kernels.push(
                (0..band_limit)
                    .map(|l| {
                        (phi2[j + 1][l] - phi2[j][l]).max(0.0).sqrt()
                    })
                    .collect(),
            );
        }
        debug!(band_limit, dilation, j_min, j_max, n_scales, "built wavelet tiling");

        Ok(Self {
            band_limit,
            dilation,
            j_min,
            j_max,
            kernels,
        })
    }

    /// Returns the band limit `L`.
    pub fn band_limit(&self) -> usize {
        self.band_limit
    }

    /// Returns the dilation factor `B`.
    pub fn dilation(&self) -> f64 {
        self.dilation
    }

    /// Returns the minimum wavelet scale.
    pub fn j_min(&self) -> usize {
        self.j_min
    }

    /// Returns the maximum wavelet scale.
    pub fn j_max(&self) -> usize {
        self.j_max
    }

    /// Number of columns in the scale table (scaling function included).
    pub fn n_scales(&self) -> usize {
        self.kernels.len()
    }

    /// Kernel values `kappa(l)` for column `column`.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::ColumnOutOfRange`] if `column >= n_scales()`.
    pub fn kernel(&self, column: usize) -> Result<&[f64], WaveletError> {
        self.kernels
            .get(column)
            .map(Vec::as_slice)
            .ok_or(WaveletError::ColumnOutOfRange {
                column,
                n_columns: self.kernels.len(),
            })
    }

    /// Wavelet scale `j` represented by `column`, or `None` for the scaling
    /// function.
    pub fn scale_of_column(&self, column: usize) -> Option<usize> {
        (column > 0 && column < self.kernels.len()).then(|| self.j_min + column - 1)
    }

    pub(crate) fn kernels(&self) -> &[Vec<f64>] {
        &self.kernels
    }
}

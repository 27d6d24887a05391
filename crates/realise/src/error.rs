//! Error types for the tomos2n-realise crate.

use tomos2n_healpix::HealpixError;
use tomos2n_wavelet::WaveletError;

/// Error type for all fallible operations in the tomos2n-realise crate.
///
/// Covers run-parameter validation, spectrum lookups, and failures
/// propagated from the harmonic and wavelet layers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RealiseError {
    /// Returned when a selected scale index falls outside `[-n_scales, n_scales)`.
    #[error("scale index {index} out of range for {n_scales} scales")]
    ScaleOutOfRange {
        /// Index as configured (may be negative).
        index: i64,
        /// Number of columns in the scale table.
        n_scales: usize,
    },

    /// Returned when no scale is selected for simulation.
    #[error("no scales selected for simulation")]
    EmptyScaleSelection,

    /// Returned when a power spectrum has fewer entries than the band limit.
    #[error("power spectrum too short: need {expected} degrees, got {got}")]
    SpectrumTooShort {
        /// Required number of degrees.
        expected: usize,
        /// Number of degrees supplied.
        got: usize,
    },

    /// Returned when a map does not match the resolution of the run.
    #[error("map has nside {got}, run expects {expected}")]
    MapResolution {
        /// Resolution fixed by the run parameters.
        expected: u32,
        /// Resolution of the offending map.
        got: u32,
    },

    /// Pixelisation or harmonic transform error.
    #[error(transparent)]
    Healpix(#[from] HealpixError),

    /// Wavelet tiling error.
    #[error(transparent)]
    Wavelet(#[from] WaveletError),
}

//! Error types for the tomos2n-wavelet crate.

use tomos2n_healpix::HealpixError;

/// Error type for all fallible operations in the tomos2n-wavelet crate.
///
/// Covers invalid tiling parameters, scale lookups and mismatched
/// coefficient tables.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveletError {
    /// Returned when the dilation factor is not a finite number above 1.
    #[error("invalid dilation {0}: must be finite and > 1")]
    InvalidDilation(f64),

    /// Returned when the band limit is too small to tile.
    #[error("invalid band limit {0}: must be at least 2")]
    InvalidBandLimit(usize),

    /// Returned when the minimum scale exceeds the maximum scale, leaving
    /// no wavelet scales.
    #[error("no wavelet scales: j_min {j_min} exceeds j_max {j_max}")]
    NoScales {
        /// Requested minimum scale.
        j_min: usize,
        /// Maximum scale implied by the band limit and dilation.
        j_max: usize,
    },

    /// Returned when the dilation is so close to 1 that the tiling would
    /// need more than [`MAX_J`](crate::MAX_J) scales.
    #[error("dilation yields j_max {j_max}, above the limit of {limit}")]
    TooManyScales {
        /// Maximum scale implied by the band limit and dilation.
        j_max: usize,
        /// Largest supported maximum scale.
        limit: usize,
    },

    /// Returned when a column index exceeds the scale table.
    #[error("scale column {column} out of range for {n_columns} columns")]
    ColumnOutOfRange {
        /// Requested column.
        column: usize,
        /// Number of columns in the table.
        n_columns: usize,
    },

    /// Returned when a coefficient table does not fit the tiling.
    #[error("scale table has {got} columns, tiling expects {expected}")]
    ColumnCountMismatch {
        /// Columns expected by the tiling.
        expected: usize,
        /// Columns present in the table.
        got: usize,
    },

    /// Harmonic layout or storage error.
    #[error(transparent)]
    Healpix(#[from] HealpixError),
}

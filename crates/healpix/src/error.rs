//! Error types for the tomos2n-healpix crate.

/// Error type for all fallible operations in the tomos2n-healpix crate.
///
/// Covers invalid resolutions, harmonic index violations and size
/// mismatches between maps, coefficient vectors and transforms.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HealpixError {
    /// Returned when the resolution parameter is zero.
    #[error("invalid nside {nside}: must be positive")]
    InvalidNside {
        /// Resolution that was provided.
        nside: u32,
    },

    /// Returned when a pixel count does not correspond to any `12 * nside^2`.
    #[error("pixel count {npix} is not 12 * nside^2 for any nside")]
    InvalidPixelCount {
        /// Pixel count that was provided.
        npix: usize,
    },

    /// Returned when a pixel index exceeds the map size.
    #[error("pixel {pix} out of range for {npix} pixels")]
    PixelOutOfRange {
        /// Requested pixel index.
        pix: usize,
        /// Number of pixels in the map.
        npix: usize,
    },

    /// Returned when a harmonic degree is at or above the band limit.
    #[error("degree {l} out of range for band limit {band_limit}")]
    DegreeOutOfRange {
        /// Requested degree.
        l: usize,
        /// Band limit `L` (degrees run `0..L`).
        band_limit: usize,
    },

    /// Returned when a harmonic order exceeds its degree.
    #[error("order {m} exceeds degree {l}")]
    OrderOutOfRange {
        /// Degree of the coefficient.
        l: usize,
        /// Requested order.
        m: usize,
    },

    /// Returned when the band limit is zero.
    #[error("band limit must be at least 1")]
    ZeroBandLimit,

    /// Returned when a data buffer has the wrong length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when two operands were built for different band limits.
    #[error("band limit mismatch: expected {expected}, got {got}")]
    BandLimitMismatch {
        /// Expected band limit.
        expected: usize,
        /// Band limit of the offending operand.
        got: usize,
    },

    /// Returned when two maps do not share a resolution.
    #[error("nside mismatch: expected {expected}, got {got}")]
    NsideMismatch {
        /// Expected resolution.
        expected: u32,
        /// Resolution of the offending map.
        got: u32,
    },
}

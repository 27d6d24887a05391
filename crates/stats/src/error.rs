//! Error types for the tomos2n-stats crate.

/// Error type for all fallible operations in the tomos2n-stats crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Returned when the ensemble has no members or no pixels.
    #[error("ensemble is empty: {rows} maps of {cols} pixels")]
    EmptyEnsemble {
        /// Number of ensemble members.
        rows: usize,
        /// Number of pixels per member.
        cols: usize,
    },

    /// Returned when a region mask excludes every pixel.
    #[error("region excludes every pixel")]
    EmptyRegion,

    /// Returned when a mask does not cover the map's pixels.
    #[error("mask has {got} pixels, maps have {expected}")]
    MaskLength {
        /// Pixels per ensemble member.
        expected: usize,
        /// Pixels in the mask.
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_ensemble() {
        let err = StatsError::EmptyEnsemble { rows: 0, cols: 12 };
        assert_eq!(err.to_string(), "ensemble is empty: 0 maps of 12 pixels");
    }

    #[test]
    fn error_empty_region() {
        assert_eq!(
            StatsError::EmptyRegion.to_string(),
            "region excludes every pixel"
        );
    }

    #[test]
    fn error_mask_length() {
        let err = StatsError::MaskLength {
            expected: 12,
            got: 48,
        };
        assert_eq!(err.to_string(), "mask has 48 pixels, maps have 12");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StatsError>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StatsError>();
    }
}

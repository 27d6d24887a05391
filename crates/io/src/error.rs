//! Error types for tomos2n-io.

use std::path::PathBuf;

use tomos2n_healpix::HealpixError;

/// Error type for all fallible operations in the tomos2n-io crate.
///
/// This enum covers file-system failures, Parquet decoding, malformed map
/// and sample files, and region-manifest problems.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when reading or writing a plain file fails.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Description of the operating-system failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when the region manifest cannot be parsed.
    #[error("invalid manifest {}: {reason}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Returned when file contents do not form a valid HEALPix map.
    #[error(transparent)]
    Healpix(#[from] HealpixError),
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, e: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn validation(details: impl Into<String>) -> Self {
        IoError::Validation {
            count: 1,
            details: details.into(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.parquet"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.parquet");
    }

    #[test]
    fn display_parquet() {
        let err = IoError::Parquet {
            reason: "bad footer".to_string(),
        };
        assert_eq!(err.to_string(), "parquet error: bad footer");
    }

    #[test]
    fn display_io() {
        let err = IoError::Io {
            path: PathBuf::from("outputs/global_1"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "i/o error on outputs/global_1: permission denied"
        );
    }

    #[test]
    fn display_validation() {
        let err = IoError::validation("line 3: expected 3 columns, got 2");
        assert_eq!(
            err.to_string(),
            "1 validation error(s): line 3: expected 3 columns, got 2"
        );
    }

    #[test]
    fn display_manifest() {
        let err = IoError::Manifest {
            path: PathBuf::from("masks/manifest.toml"),
            reason: "missing field `name`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid manifest masks/manifest.toml: missing field `name`"
        );
    }

    #[test]
    fn healpix_error_is_transparent() {
        let err: IoError = HealpixError::InvalidPixelCount { npix: 13 }.into();
        assert_eq!(
            err.to_string(),
            "pixel count 13 is not 12 * nside^2 for any nside"
        );
    }

    #[test]
    fn from_parquet_error() {
        let pe = parquet::errors::ParquetError::General("boom".to_string());
        let err: IoError = pe.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IoError>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<IoError>();
    }
}

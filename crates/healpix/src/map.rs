//! Pixelised spherical maps.

use crate::error::HealpixError;
use crate::nside::Nside;

/// Sentinel marking an unobserved pixel or an undefined statistic.
///
/// Matches the HEALPix convention so files stay readable by other tools.
pub const UNSEEN: f64 = -1.6375e30;

/// Real-valued samples over the HEALPix RING pixelisation.
///
/// The pixel count is always `12 * nside^2`.
#[derive(Clone, Debug, PartialEq)]
pub struct SphericalMap {
    nside: Nside,
    data: Vec<f64>,
}

impl SphericalMap {
    /// Wraps pixel values at a known resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::LengthMismatch`] if `data.len() != nside.npix()`.
    pub fn new(nside: Nside, data: Vec<f64>) -> Result<Self, HealpixError> {
        if data.len() != nside.npix() {
            return Err(HealpixError::LengthMismatch {
                expected: nside.npix(),
                got: data.len(),
            });
        }
        Ok(Self { nside, data })
    }

    /// Wraps pixel values, inferring the resolution from their count.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::InvalidPixelCount`] if the length is not a
    /// HEALPix pixel count.
    pub fn from_vec(data: Vec<f64>) -> Result<Self, HealpixError> {
        let nside = Nside::from_npix(data.len())?;
        Ok(Self { nside, data })
    }

    /// A map with every pixel set to `value`.
    pub fn filled(nside: Nside, value: f64) -> Self {
        Self {
            nside,
            data: vec![value; nside.npix()],
        }
    }

    /// Returns the resolution.
    pub fn nside(&self) -> Nside {
        self.nside
    }

    /// Returns the number of pixels.
    pub fn npix(&self) -> usize {
        self.data.len()
    }

    /// Returns the pixel values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the pixel values mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the map, returning its pixel values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Number of pixels holding the [`UNSEEN`] sentinel.
    pub fn n_unseen(&self) -> usize {
        self.data.iter().filter(|&&v| v == UNSEEN).count()
    }

    /// Checks that `other` shares this map's resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::NsideMismatch`] otherwise.
    pub fn ensure_same_nside(&self, other: &SphericalMap) -> Result<(), HealpixError> {
        if self.nside != other.nside {
            return Err(HealpixError::NsideMismatch {
                expected: self.nside.get(),
                got: other.nside.get(),
            });
        }
        Ok(())
    }
}

impl AsRef<[f64]> for SphericalMap {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length() {
        let nside = Nside::new(1).unwrap();
        assert!(SphericalMap::new(nside, vec![0.0; 12]).is_ok());
        assert_eq!(
            SphericalMap::new(nside, vec![0.0; 11]),
            Err(HealpixError::LengthMismatch {
                expected: 12,
                got: 11
            })
        );
    }

    #[test]
    fn from_vec_infers_nside() {
        let map = SphericalMap::from_vec(vec![1.0; 48]).unwrap();
        assert_eq!(map.nside().get(), 2);
        assert_eq!(map.npix(), 48);
    }

    #[test]
    fn unseen_count() {
        let mut map = SphericalMap::filled(Nside::new(1).unwrap(), 0.5);
        map.as_mut_slice()[3] = UNSEEN;
        map.as_mut_slice()[7] = UNSEEN;
        assert_eq!(map.n_unseen(), 2);
    }

    #[test]
    fn nside_mismatch_detected() {
        let a = SphericalMap::filled(Nside::new(1).unwrap(), 0.0);
        let b = SphericalMap::filled(Nside::new(2).unwrap(), 0.0);
        assert_eq!(
            a.ensure_same_nside(&b),
            Err(HealpixError::NsideMismatch {
                expected: 1,
                got: 2
            })
        );
        assert!(a.ensure_same_nside(&a.clone()).is_ok());
    }
}

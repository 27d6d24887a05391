//! HEALPix resolution parameter and RING-scheme geometry.

use std::f64::consts::{FRAC_2_PI, FRAC_PI_2, FRAC_PI_4, TAU};

use crate::error::HealpixError;

/// HEALPix resolution parameter.
///
/// Fixes the pixel count of every map at this resolution:
/// `npix = 12 * nside^2`. Any positive value is accepted; the RING scheme
/// does not require a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nside(u32);

impl Nside {
    /// Creates a validated resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::InvalidNside`] if `nside == 0`.
    pub fn new(nside: u32) -> Result<Self, HealpixError> {
        if nside == 0 {
            return Err(HealpixError::InvalidNside { nside });
        }
        Ok(Self(nside))
    }

    /// Recovers the resolution from a pixel count.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::InvalidPixelCount`] unless `npix == 12 * n^2`
    /// for some positive `n`.
    pub fn from_npix(npix: usize) -> Result<Self, HealpixError> {
        if npix == 0 || npix % 12 != 0 {
            return Err(HealpixError::InvalidPixelCount { npix });
        }
        let n = (npix / 12).isqrt();
        if n * n * 12 != npix {
            return Err(HealpixError::InvalidPixelCount { npix });
        }
        let nside = u32::try_from(n).map_err(|_| HealpixError::InvalidPixelCount { npix })?;
        Self::new(nside)
    }

    /// Returns the raw resolution value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of pixels at this resolution.
    pub fn npix(self) -> usize {
        let n = self.0 as usize;
        12 * n * n
    }

    /// Number of iso-latitude rings, `4 * nside - 1`.
    pub fn n_rings(self) -> usize {
        4 * self.0 as usize - 1
    }

    /// Number of pixels in the north polar cap.
    fn ncap(self) -> usize {
        let n = self.0 as usize;
        2 * n * (n - 1)
    }

    /// Geometry of ring `index` (1-based, north to south).
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `1..=n_rings()`.
    pub fn ring(self, index: usize) -> Ring {
        assert!(
            (1..=self.n_rings()).contains(&index),
            "ring index {index} out of range"
        );
        let n = self.0 as usize;
        let nf = n as f64;
        if index < n {
            let i = index as f64;
            Ring {
                index,
                z: 1.0 - i * i / (3.0 * nf * nf),
                start: 2 * index * (index - 1),
                len: 4 * index,
                phi0: FRAC_PI_4 / i,
            }
        } else if index <= 3 * n {
            let shifted = (index + n) % 2 == 0;
            Ring {
                index,
                z: (2.0 * nf - index as f64) * 2.0 / (3.0 * nf),
                start: self.ncap() + (index - n) * 4 * n,
                len: 4 * n,
                phi0: if shifted { FRAC_PI_4 / nf } else { 0.0 },
            }
        } else {
            let south = 4 * n - index;
            let i = south as f64;
            Ring {
                index,
                z: -(1.0 - i * i / (3.0 * nf * nf)),
                start: self.npix() - 2 * south * (south + 1),
                len: 4 * south,
                phi0: FRAC_PI_4 / i,
            }
        }
    }

    /// Iterates over all rings from north to south.
    pub fn rings(self) -> impl Iterator<Item = Ring> {
        (1..=self.n_rings()).map(move |i| self.ring(i))
    }

    /// Ring (1-based) that contains pixel `pix`.
    fn ring_of(self, pix: usize) -> usize {
        let n = self.0 as usize;
        let npix = self.npix();
        let ncap = self.ncap();
        if pix < ncap {
            (1 + (1 + 2 * pix).isqrt()) / 2
        } else if pix < npix - ncap {
            (pix - ncap) / (4 * n) + n
        } else {
            let ip = npix - pix;
            4 * n - (1 + (2 * ip - 1).isqrt()) / 2
        }
    }

    /// Colatitude and longitude `(theta, phi)` of the centre of `pix`.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::PixelOutOfRange`] if `pix >= npix`.
    pub fn pix2ang(self, pix: usize) -> Result<(f64, f64), HealpixError> {
        let npix = self.npix();
        if pix >= npix {
            return Err(HealpixError::PixelOutOfRange { pix, npix });
        }
        let ring = self.ring(self.ring_of(pix));
        Ok((ring.z.acos(), ring.phi(pix - ring.start)))
    }

    /// Pixel containing the direction `(theta, phi)` in RING order.
    ///
    /// `theta` is the colatitude in `[0, pi]`; `phi` may be any finite
    /// longitude and is wrapped into `[0, 2 pi)`.
    pub fn ang2pix(self, theta: f64, phi: f64) -> usize {
        let n = i64::from(self.0);
        let nf = n as f64;
        let z = theta.cos();
        let za = z.abs();
        let tt = phi.rem_euclid(TAU) * FRAC_2_PI;

        let pix = if za <= 2.0 / 3.0 {
            let temp1 = nf * (0.5 + tt);
            let temp2 = nf * z * 0.75;
            let jp = (temp1 - temp2) as i64;
            let jm = (temp1 + temp2) as i64;
            let ir = n + 1 + jp - jm;
            let kshift = 1 - (ir & 1);
            let ip = ((jp + jm - n + kshift + 1) / 2).rem_euclid(4 * n);
            self.ncap() as i64 + (ir - 1) * 4 * n + ip
        } else {
            let tp = tt - tt.floor();
            let tmp = nf * (3.0 * (1.0 - za)).sqrt();
            let jp = (tp * tmp) as i64;
            let jm = ((1.0 - tp) * tmp) as i64;
            let ir = jp + jm + 1;
            let ip = ((tt * ir as f64) as i64).rem_euclid(4 * ir);
            if z > 0.0 {
                2 * ir * (ir - 1) + ip
            } else {
                self.npix() as i64 - 2 * ir * (ir + 1) + ip
            }
        };
        pix as usize
    }

    /// Pixel containing the point at `lon`, `lat` (degrees).
    pub fn lonlat2pix(self, lon: f64, lat: f64) -> usize {
        let theta = FRAC_PI_2 - lat.to_radians();
        self.ang2pix(theta.clamp(0.0, std::f64::consts::PI), lon.to_radians())
    }
}

impl std::fmt::Display for Nside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One iso-latitude ring of the RING scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    /// 1-based ring number, north to south.
    pub index: usize,
    /// Cosine of the ring colatitude.
    pub z: f64,
    /// First pixel of the ring.
    pub start: usize,
    /// Number of pixels in the ring.
    pub len: usize,
    /// Longitude of the first pixel centre.
    pub phi0: f64,
}

impl Ring {
    /// Longitude of the `k`-th pixel centre in this ring.
    pub fn phi(&self, k: usize) -> f64 {
        self.phi0 + k as f64 * TAU / self.len as f64
    }

    /// Pixel index range covered by the ring.
    pub fn pixels(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

//! Spherical harmonic transforms between maps and coefficients.
//!
//! [`SphericalTransform`] is the seam the rest of the workspace programs
//! against. [`DirectTransform`] evaluates the harmonic sums ring by ring
//! over the HEALPix grid: exact on synthesis, equal-weight quadrature on
//! analysis (no iterative refinement).

use std::f64::consts::PI;

use num_complex::Complex64;
use tracing::trace;

use crate::alm::{Alm, AlmLayout};
use crate::error::HealpixError;
use crate::map::{SphericalMap, UNSEEN};
use crate::nside::{Nside, Ring};

/// Forward and inverse spherical harmonic transforms for real fields.
pub trait SphericalTransform {
    /// Harmonic coefficients of `map` up to degree `layout.lmax()`.
    ///
    /// Pixels holding [`UNSEEN`] contribute nothing.
    fn map2alm(&self, map: &SphericalMap, layout: AlmLayout) -> Result<Alm, HealpixError>;

    /// Map at resolution `nside` synthesised from `alm`.
    fn alm2map(&self, alm: &Alm, nside: Nside) -> Result<SphericalMap, HealpixError>;

    /// Angular power spectrum of `map` up to degree `layout.lmax()`.
    fn anafast(&self, map: &SphericalMap, layout: AlmLayout) -> Result<Vec<f64>, HealpixError> {
        Ok(self.map2alm(map, layout)?.power_spectrum())
    }
}

/// Ring-by-ring direct-summation transform for one `(nside, L)` pair.
///
/// Construction tabulates the orthonormalised associated Legendre
/// functions at every ring latitude, so each transform costs
/// `O(n_rings * L^2 + npix * L)`.
#[derive(Clone, Debug)]
pub struct DirectTransform {
    nside: Nside,
    layout: AlmLayout,
    rings: Vec<Ring>,
    /// `lambda[r * layout.size() + idx(l, m)]`.
    lambda: Vec<f64>,
}

impl DirectTransform {
    /// Tabulates ring geometry and Legendre values.
    pub fn new(nside: Nside, layout: AlmLayout) -> Self {
        let rings: Vec<Ring> = nside.rings().collect();
        let size = layout.size();
        let mut lambda = vec![0.0; rings.len() * size];
        for (ring, chunk) in rings.iter().zip(lambda.chunks_exact_mut(size)) {
            legendre_table(ring.z, layout, chunk);
        }
        trace!(
            nside = nside.get(),
            band_limit = layout.band_limit(),
            n_rings = rings.len(),
            "tabulated Legendre functions"
        );
        Self {
            nside,
            layout,
            rings,
            lambda,
        }
    }

    /// Returns the resolution this transform was built for.
    pub fn nside(&self) -> Nside {
        self.nside
    }

    /// Returns the coefficient layout this transform was built for.
    pub fn layout(&self) -> AlmLayout {
        self.layout
    }

    fn check(&self, nside: Nside, layout: AlmLayout) -> Result<(), HealpixError> {
        if nside != self.nside {
            return Err(HealpixError::NsideMismatch {
                expected: self.nside.get(),
                got: nside.get(),
            });
        }
        if layout != self.layout {
            return Err(HealpixError::BandLimitMismatch {
                expected: self.layout.band_limit(),
                got: layout.band_limit(),
            });
        }
        Ok(())
    }
}

impl SphericalTransform for DirectTransform {
    fn map2alm(&self, map: &SphericalMap, layout: AlmLayout) -> Result<Alm, HealpixError> {
        self.check(map.nside(), layout)?;
        let band_limit = layout.band_limit();
        let size = layout.size();
        let weight = 4.0 * PI / map.npix() as f64;
        let pixels = map.as_slice();

        let mut alm = Alm::zeros(layout);
        let mut fourier = vec![Complex64::new(0.0, 0.0); band_limit];
        for (r, ring) in self.rings.iter().enumerate() {
            // F_m = sum_k f_k exp(-i m phi_k) over the ring.
            fourier.fill(Complex64::new(0.0, 0.0));
            for (k, &value) in pixels[ring.pixels()].iter().enumerate() {
                if value == UNSEEN {
                    continue;
                }
                let phi = ring.phi(k);
                for (m, f) in fourier.iter_mut().enumerate() {
                    *f += Complex64::from_polar(value, -(m as f64) * phi);
                }
            }
            let lambda = &self.lambda[r * size..(r + 1) * size];
            for (i, (_, m)) in layout.iter().enumerate() {
                alm.as_mut_slice()[i] += fourier[m] * (lambda[i] * weight);
            }
        }
        trace!(npix = map.npix(), band_limit, "map2alm");
        Ok(alm)
    }

    fn alm2map(&self, alm: &Alm, nside: Nside) -> Result<SphericalMap, HealpixError> {
        let layout = alm.layout();
        self.check(nside, layout)?;
        let band_limit = layout.band_limit();
        let size = layout.size();
        let coeffs = alm.as_slice();

        let mut out = vec![0.0; nside.npix()];
        let mut partial = vec![Complex64::new(0.0, 0.0); band_limit];
        for (r, ring) in self.rings.iter().enumerate() {
            // G_m = sum_l a_lm lambda_lm(z) for this ring.
            partial.fill(Complex64::new(0.0, 0.0));
            let lambda = &self.lambda[r * size..(r + 1) * size];
            for (i, (_, m)) in layout.iter().enumerate() {
                partial[m] += coeffs[i] * lambda[i];
            }
            for (k, pixel) in out[ring.pixels()].iter_mut().enumerate() {
                let phi = ring.phi(k);
                let mut value = partial[0].re;
                for (m, g) in partial.iter().enumerate().skip(1) {
                    value += 2.0 * (*g * Complex64::from_polar(1.0, m as f64 * phi)).re;
                }
                *pixel = value;
            }
        }
        trace!(npix = out.len(), band_limit, "alm2map");
        SphericalMap::new(nside, out)
    }
}

/// Fills `out` (storage order of `layout`) with the orthonormalised
/// associated Legendre functions `lambda_lm(z)`, Condon-Shortley phase
/// included, so that `Y_lm = lambda_lm(cos theta) exp(i m phi)`.
fn legendre_table(z: f64, layout: AlmLayout, out: &mut [f64]) {
    let band_limit = layout.band_limit();
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    let mut pmm = (1.0 / (4.0 * PI)).sqrt();
    for m in 0..band_limit {
        let mf = m as f64;
        if m > 0 {
            pmm *= -((2.0 * mf + 1.0) / (2.0 * mf)).sqrt() * sin_theta;
        }
        out[layout.offset(m, m)] = pmm;
        if m + 1 >= band_limit {
            continue;
        }
        let mut prev2 = pmm;
        let mut prev = z * (2.0 * mf + 3.0).sqrt() * pmm;
        out[layout.offset(m + 1, m)] = prev;
        for l in m + 2..band_limit {
            let lf = l as f64;
            let a = ((4.0 * lf * lf - 1.0) / (lf * lf - mf * mf)).sqrt();
            let b = (((lf - 1.0) * (lf - 1.0) - mf * mf) / (4.0 * (lf - 1.0) * (lf - 1.0) - 1.0))
                .sqrt();
            let current = a * (z * prev - b * prev2);
            out[layout.offset(l, m)] = current;
            prev2 = prev;
            prev = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table(z: f64, band_limit: usize) -> (AlmLayout, Vec<f64>) {
        let layout = AlmLayout::new(band_limit).unwrap();
        let mut out = vec![0.0; layout.size()];
        legendre_table(z, layout, &mut out);
        (layout, out)
    }

    #[test]
    fn legendre_low_degrees_match_closed_forms() {
        let z: f64 = 0.3;
        let s = (1.0 - z * z).sqrt();
        let (layout, lambda) = table(z, 3);
        let at = |l, m| lambda[layout.index(l, m).unwrap()];

        assert_abs_diff_eq!(at(0, 0), (1.0 / (4.0 * PI)).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(at(1, 0), (3.0 / (4.0 * PI)).sqrt() * z, epsilon = 1e-12);
        assert_abs_diff_eq!(at(1, 1), -(3.0 / (8.0 * PI)).sqrt() * s, epsilon = 1e-12);
        assert_abs_diff_eq!(
            at(2, 0),
            (5.0 / (4.0 * PI)).sqrt() * 0.5 * (3.0 * z * z - 1.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            at(2, 1),
            -(15.0 / (8.0 * PI)).sqrt() * s * z,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            at(2, 2),
            0.25 * (15.0 / (2.0 * PI)).sqrt() * s * s,
            epsilon = 1e-12
        );
    }

    #[test]
    fn constant_map_has_exact_monopole() {
        let nside = Nside::new(4).unwrap();
        let layout = AlmLayout::new(4).unwrap();
        let transform = DirectTransform::new(nside, layout);
        let map = SphericalMap::filled(nside, 2.5);
        let alm = transform.map2alm(&map, layout).unwrap();
        assert_abs_diff_eq!(alm.get(0, 0).unwrap().re, 2.5 * (4.0 * PI).sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(alm.get(0, 0).unwrap().im, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn monopole_synthesises_constant_map() {
        let nside = Nside::new(2).unwrap();
        let layout = AlmLayout::new(3).unwrap();
        let transform = DirectTransform::new(nside, layout);
        let mut alm = Alm::zeros(layout);
        alm.set(0, 0, Complex64::new((4.0 * PI).sqrt(), 0.0)).unwrap();
        let map = transform.alm2map(&alm, nside).unwrap();
        for &v in map.as_slice() {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn mismatched_resolution_rejected() {
        let layout = AlmLayout::new(3).unwrap();
        let transform = DirectTransform::new(Nside::new(2).unwrap(), layout);
        let map = SphericalMap::filled(Nside::new(1).unwrap(), 0.0);
        assert!(matches!(
            transform.map2alm(&map, layout),
            Err(HealpixError::NsideMismatch { .. })
        ));
        let other = AlmLayout::new(4).unwrap();
        let map = SphericalMap::filled(Nside::new(2).unwrap(), 0.0);
        assert!(matches!(
            transform.map2alm(&map, other),
            Err(HealpixError::BandLimitMismatch { .. })
        ));
    }
}

//! Random harmonic coefficients drawn from a power spectrum.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use tomos2n_healpix::{Alm, AlmLayout, Complex64};

use crate::error::RealiseError;
use crate::params::DrawScheme;

/// Draws one coefficient vector whose power follows `cl`.
///
/// The monopole and dipole stay zero. For every `l >= 2` (ascending) and
/// `m = 0..=l` (ascending):
///
/// - `a_l0 = N * sqrt(cl[l])`
/// - `a_lm = (x + i y) * sqrt(cl[l] / 2)` for `m > 0`, with `y ~ N(0, 1)`
///   and `x` drawn per `scheme`
///
/// The real part is drawn before the imaginary part, so a given RNG state
/// always yields the same coefficients.
///
/// # Errors
///
/// Returns [`RealiseError::SpectrumTooShort`] if `cl` has fewer than `L`
/// entries.
pub fn generate_scale_alm<R: Rng>(
    cl: &[f64],
    layout: AlmLayout,
    scheme: DrawScheme,
    rng: &mut R,
) -> Result<Alm, RealiseError> {
    let band_limit = layout.band_limit();
    if cl.len() < band_limit {
        return Err(RealiseError::SpectrumTooShort {
            expected: band_limit,
            got: cl.len(),
        });
    }

    let mut alm = Alm::zeros(layout);
    for (l, &power) in cl.iter().enumerate().take(band_limit).skip(2) {
        let amplitude = power.max(0.0).sqrt();
        let z: f64 = StandardNormal.sample(rng);
        alm.set(l, 0, Complex64::new(z * amplitude, 0.0))?;

        let half = (power.max(0.0) * 0.5).sqrt();
        for m in 1..=l {
            let re: f64 = match scheme {
                DrawScheme::Reference => rng.random::<f64>(),
                DrawScheme::Gaussian => StandardNormal.sample(rng),
            };
            let im: f64 = StandardNormal.sample(rng);
            alm.set(l, m, Complex64::new(re * half, im * half))?;
        }
    }
    Ok(alm)
}

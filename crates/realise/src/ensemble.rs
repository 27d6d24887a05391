//! Monte-Carlo ensemble of randomised maps.

use ndarray::{Array2, ArrayView1};
use rand::Rng;
use tomos2n_healpix::{SphericalMap, SphericalTransform};
use tracing::{debug, info};

use crate::bridge::{Decomposition, WaveletBridge};
use crate::error::RealiseError;
use crate::generator::generate_scale_alm;
use crate::params::RunParams;

/// Builds `nmaps` random maps followed by the original.
///
/// Each simulated map copies the real scale table, replaces every selected
/// column with a fresh draw from that column's spectrum (in configured
/// order, so a repeated column keeps its last draw), and resynthesises.
/// Unselected columns, the scaling function included, keep their real
/// coefficients.
///
/// The result has shape `(nmaps + 1, npix)`; row `nmaps` is `original`
/// bit for bit. With `progress` set, every finished map is reported at
/// `debug` level.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RealiseError::MapResolution`] | `original` is not at the bridge's `Nside` |
/// | [`RealiseError::SpectrumTooShort`] | spectrum shorter than `L` |
/// | [`RealiseError::Wavelet`] | a selected column is outside the table |
pub fn build_ensemble<T: SphericalTransform, R: Rng>(
    original: &SphericalMap,
    decomposition: &Decomposition,
    bridge: &WaveletBridge<T>,
    params: &RunParams,
    rng: &mut R,
    progress: bool,
) -> Result<Array2<f64>, RealiseError> {
    bridge.check_map(original)?;
    let nmaps = params.nmaps();
    let npix = original.npix();
    let layout = bridge.layout();
    let power = decomposition.power();

    let spectra = params
        .simscales()
        .iter()
        .map(|&scale| {
            power
                .column(scale)
                .map(|cl| (scale, cl.to_vec()))
                .ok_or(RealiseError::ScaleOutOfRange {
                    index: scale as i64,
                    n_scales: power.n_scales(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(nmaps, npix, n_simulated = spectra.len(), "building ensemble");
    let mut ensemble = Array2::zeros((nmaps + 1, npix));
    for i in 0..nmaps {
        let mut table = decomposition.wavelets().clone();
        for (scale, cl) in &spectra {
            let alm = generate_scale_alm(cl, layout, params.draw_scheme(), rng)?;
            table.replace(*scale, alm)?;
        }
        let map = bridge.to_map(&bridge.synthesize(&table)?)?;
        ensemble
            .row_mut(i)
            .assign(&ArrayView1::from(map.as_slice()));
        if progress {
            debug!(map = i + 1, nmaps, "simulated map");
        }
    }
    ensemble
        .row_mut(nmaps)
        .assign(&ArrayView1::from(original.as_slice()));
    Ok(ensemble)
}

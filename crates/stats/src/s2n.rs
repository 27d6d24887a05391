//! Signal-to-noise statistics over an ensemble of maps.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tomos2n_healpix::UNSEEN;
use tracing::{debug, warn};

use crate::error::StatsError;

/// Mask value marking an excluded pixel.
const EXCLUDED: f64 = 1.0;

/// Summary maps and S2N reductions of one ensemble.
///
/// Rows are ensemble members, columns are pixels; by convention the last
/// row is the real map. The per-pixel mean and population standard
/// deviation (`ddof = 0`) are computed once at construction.
///
/// Pixels whose standard deviation is zero or not finite carry no noise
/// estimate and are left out of every ratio mean. If no usable pixel
/// remains, the S2N value is [`UNSEEN`].
#[derive(Debug, Clone)]
pub struct S2nStats {
    ensemble: Array2<f64>,
    mean: Array1<f64>,
    error: Array1<f64>,
}

impl S2nStats {
    /// Computes the summary maps of `ensemble`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptyEnsemble`] if `ensemble` has no rows or no
    /// columns.
    pub fn new(ensemble: Array2<f64>) -> Result<Self, StatsError> {
        let (rows, cols) = ensemble.dim();
        if rows == 0 || cols == 0 {
            return Err(StatsError::EmptyEnsemble { rows, cols });
        }
        let mean = ensemble
            .mean_axis(Axis(0))
            .ok_or(StatsError::EmptyEnsemble { rows, cols })?;
        let error = ensemble.std_axis(Axis(0), 0.0);
        Ok(Self {
            ensemble,
            mean,
            error,
        })
    }

    /// Number of ensemble members, `nmaps + 1`.
    pub fn n_members(&self) -> usize {
        self.ensemble.nrows()
    }

    /// Number of pixels per member.
    pub fn npix(&self) -> usize {
        self.ensemble.ncols()
    }

    /// Returns the ensemble.
    pub fn ensemble(&self) -> &Array2<f64> {
        &self.ensemble
    }

    /// Per-pixel mean and standard deviation across the ensemble.
    pub fn summary_maps(&self) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        (self.mean.view(), self.error.view())
    }

    /// Mean over all pixels of `member / error`, one value per member.
    pub fn global_s2n(&self) -> Vec<f64> {
        let pixels: Vec<usize> = (0..self.npix()).collect();
        self.ratio_means(&pixels, "global")
    }

    /// Same reduction as [`global_s2n`](Self::global_s2n), confined to the
    /// pixels where `mask != 1`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`StatsError::MaskLength`] | `mask.len()` differs from the pixel count |
    /// | [`StatsError::EmptyRegion`] | every pixel is masked out |
    pub fn local_s2n(&self, mask: &[f64]) -> Result<Vec<f64>, StatsError> {
        if mask.len() != self.npix() {
            return Err(StatsError::MaskLength {
                expected: self.npix(),
                got: mask.len(),
            });
        }
        let pixels: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m != EXCLUDED)
            .map(|(pix, _)| pix)
            .collect();
        if pixels.is_empty() {
            return Err(StatsError::EmptyRegion);
        }
        Ok(self.ratio_means(&pixels, "local"))
    }

    fn ratio_means(&self, pixels: &[usize], scope: &str) -> Vec<f64> {
        let usable: Vec<usize> = pixels
            .iter()
            .copied()
            .filter(|&pix| {
                let e = self.error[pix];
                e.is_finite() && e > 0.0
            })
            .collect();
        let excluded = pixels.len() - usable.len();
        if excluded > 0 {
            warn!(
                scope,
                excluded,
                total = pixels.len(),
                "excluding pixels with zero or undefined ensemble error"
            );
        }
        if usable.is_empty() {
            return vec![UNSEEN; self.n_members()];
        }

        let n = usable.len() as f64;
        let values: Vec<f64> = self
            .ensemble
            .rows()
            .into_iter()
            .map(|member| {
                usable
                    .iter()
                    .map(|&pix| member[pix] / self.error[pix])
                    .sum::<f64>()
                    / n
            })
            .collect();
        debug!(scope, pixels = usable.len(), "computed S2N");
        values
    }
}

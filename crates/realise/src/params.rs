//! Validated parameters for one Monte-Carlo run.

use tomos2n_healpix::{AlmLayout, Nside};
use tomos2n_wavelet::n_scales;

use crate::error::RealiseError;

/// Distribution of the real part of `m > 0` coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawScheme {
    /// Real part uniform on `[0, 1)`, imaginary part standard normal.
    #[default]
    Reference,
    /// Real and imaginary parts both standard normal.
    Gaussian,
}

/// Scales to replace with random realisations, as configured.
///
/// Indices address columns of the scale table (column 0 is the scaling
/// function). Negative indices count from the end, so `-1` is the last
/// wavelet scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleSelection(Vec<i64>);

impl ScaleSelection {
    /// Wraps raw scale indices.
    pub fn new(indices: Vec<i64>) -> Self {
        Self(indices)
    }

    /// Raw indices in configured order.
    pub fn indices(&self) -> &[i64] {
        &self.0
    }

    /// Resolves every index against a table of `n_scales` columns.
    ///
    /// Order and duplicates are preserved.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RealiseError::EmptyScaleSelection`] | no indices |
    /// | [`RealiseError::ScaleOutOfRange`] | index outside `[-n_scales, n_scales)` |
    pub fn resolve(&self, n_scales: usize) -> Result<Vec<usize>, RealiseError> {
        if self.0.is_empty() {
            return Err(RealiseError::EmptyScaleSelection);
        }
        let n = n_scales as i64;
        self.0
            .iter()
            .map(|&index| {
                let absolute = if index < 0 { index + n } else { index };
                if (0..n).contains(&absolute) {
                    Ok(absolute as usize)
                } else {
                    Err(RealiseError::ScaleOutOfRange { index, n_scales })
                }
            })
            .collect()
    }
}

impl Default for ScaleSelection {
    fn default() -> Self {
        Self(vec![-1])
    }
}

/// Immutable, validated parameters of one realisation run.
///
/// Construction checks the `(L, B, J_min)` triple and resolves the scale
/// selection, so no transform is attempted with an inconsistent setup.
///
/// # Example
///
/// ```
/// use tomos2n_healpix::Nside;
/// use tomos2n_realise::{RunParams, ScaleSelection};
///
/// let params = RunParams::new(Nside::new(32)?, 35, 1.5, 2, &ScaleSelection::default())?
///     .with_nmaps(100)
///     .with_seed(7);
/// assert_eq!(params.n_scales(), 9);
/// assert_eq!(params.simscales(), &[8]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    nside: Nside,
    layout: AlmLayout,
    dilation: f64,
    j_min: usize,
    n_scales: usize,
    simscales: Vec<usize>,
    nmaps: usize,
    draw: DrawScheme,
    seed: Option<u64>,
}

impl RunParams {
    /// Validates the transform parameters and resolves `selection`.
    ///
    /// Defaults: `nmaps = 500`, [`DrawScheme::Reference`], no seed.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RealiseError::Wavelet`] | `B <= 1`, `L < 2`, or `J_min > J` |
    /// | [`RealiseError::EmptyScaleSelection`] | `selection` is empty |
    /// | [`RealiseError::ScaleOutOfRange`] | an index does not address a column |
    pub fn new(
        nside: Nside,
        band_limit: usize,
        dilation: f64,
        j_min: usize,
        selection: &ScaleSelection,
    ) -> Result<Self, RealiseError> {
        let n_scales = n_scales(band_limit, dilation, j_min)?;
        let simscales = selection.resolve(n_scales)?;
        let layout = AlmLayout::new(band_limit)?;
        Ok(Self {
            nside,
            layout,
            dilation,
            j_min,
            n_scales,
            simscales,
            nmaps: 500,
            draw: DrawScheme::default(),
            seed: None,
        })
    }

    /// Sets the number of simulated maps.
    pub fn with_nmaps(mut self, nmaps: usize) -> Self {
        self.nmaps = nmaps;
        self
    }

    /// Sets the distribution used for `m > 0` real parts.
    pub fn with_draw_scheme(mut self, draw: DrawScheme) -> Self {
        self.draw = draw;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the map resolution.
    pub fn nside(&self) -> Nside {
        self.nside
    }

    /// Returns the band limit `L`.
    pub fn band_limit(&self) -> usize {
        self.layout.band_limit()
    }

    /// Returns the dilation factor `B`.
    pub fn dilation(&self) -> f64 {
        self.dilation
    }

    /// Returns the minimum wavelet scale.
    pub fn j_min(&self) -> usize {
        self.j_min
    }

    /// Number of columns in the scale table.
    pub fn n_scales(&self) -> usize {
        self.n_scales
    }

    /// Resolved (absolute) scale columns to simulate, in configured order.
    pub fn simscales(&self) -> &[usize] {
        &self.simscales
    }

    /// Returns the number of simulated maps.
    pub fn nmaps(&self) -> usize {
        self.nmaps
    }

    /// Returns the draw scheme.
    pub fn draw_scheme(&self) -> DrawScheme {
        self.draw
    }

    /// Returns the seed, if set.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Harmonic layout for degrees `0..L`.
    pub fn layout(&self) -> AlmLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomos2n_wavelet::WaveletError;

    fn nside() -> Nside {
        Nside::new(4).unwrap()
    }

    #[test]
    fn negative_index_counts_from_end() {
        let selection = ScaleSelection::new(vec![-1]);
        assert_eq!(selection.resolve(5).unwrap(), vec![4]);
        assert_eq!(
            selection.resolve(5).unwrap(),
            ScaleSelection::new(vec![4]).resolve(5).unwrap()
        );
        assert_eq!(ScaleSelection::new(vec![-5]).resolve(5).unwrap(), vec![0]);
    }

    #[test]
    fn resolve_keeps_order_and_duplicates() {
        let selection = ScaleSelection::new(vec![3, -1, 1, -2]);
        assert_eq!(selection.resolve(5).unwrap(), vec![3, 4, 1, 3]);
    }

    #[test]
    fn resolve_rejects_out_of_range() {
        assert_eq!(
            ScaleSelection::new(vec![5]).resolve(5),
            Err(RealiseError::ScaleOutOfRange {
                index: 5,
                n_scales: 5
            })
        );
        assert_eq!(
            ScaleSelection::new(vec![0, -6]).resolve(5),
            Err(RealiseError::ScaleOutOfRange {
                index: -6,
                n_scales: 5
            })
        );
    }

    #[test]
    fn resolve_rejects_empty() {
        assert_eq!(
            ScaleSelection::new(vec![]).resolve(5),
            Err(RealiseError::EmptyScaleSelection)
        );
    }

    #[test]
    fn params_defaults() {
        let params = RunParams::new(nside(), 35, 1.5, 2, &ScaleSelection::default()).unwrap();
        assert_eq!(params.n_scales(), 9);
        assert_eq!(params.simscales(), &[8]);
        assert_eq!(params.nmaps(), 500);
        assert_eq!(params.draw_scheme(), DrawScheme::Reference);
        assert_eq!(params.seed(), None);
        assert_eq!(params.layout().size(), 35 * 36 / 2);
    }

    #[test]
    fn params_builders() {
        let params = RunParams::new(nside(), 16, 2.0, 0, &ScaleSelection::new(vec![1, 2]))
            .unwrap()
            .with_nmaps(3)
            .with_draw_scheme(DrawScheme::Gaussian)
            .with_seed(99);
        assert_eq!(params.nmaps(), 3);
        assert_eq!(params.draw_scheme(), DrawScheme::Gaussian);
        assert_eq!(params.seed(), Some(99));
        assert_eq!(params.simscales(), &[1, 2]);
    }

    #[test]
    fn params_reject_invalid_transform() {
        let sel = ScaleSelection::default();
        assert_eq!(
            RunParams::new(nside(), 35, 1.0, 2, &sel).unwrap_err(),
            RealiseError::Wavelet(WaveletError::InvalidDilation(1.0))
        );
        assert_eq!(
            RunParams::new(nside(), 1, 2.0, 0, &sel).unwrap_err(),
            RealiseError::Wavelet(WaveletError::InvalidBandLimit(1))
        );
        assert_eq!(
            RunParams::new(nside(), 35, 1.5, 12, &sel).unwrap_err(),
            RealiseError::Wavelet(WaveletError::NoScales { j_min: 12, j_max: 9 })
        );
    }

    #[test]
    fn params_reject_bad_selection() {
        assert!(matches!(
            RunParams::new(nside(), 35, 1.5, 2, &ScaleSelection::new(vec![9])),
            Err(RealiseError::ScaleOutOfRange { index: 9, .. })
        ));
    }
}

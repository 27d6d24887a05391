//! Axisymmetric wavelet analysis and synthesis in harmonic space.

use tomos2n_healpix::{Alm, HealpixError};

use crate::error::WaveletError;
use crate::scales::ScaleCoefficients;
use crate::tiling::AxisymTiling;

impl AxisymTiling {
    /// Splits `flm` into one column per scale.
    ///
    /// Column `c` holds `kappa_c(l) * a_lm`.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::Healpix`] if `flm` does not use this tiling's
    /// band limit.
    pub fn analysis(&self, flm: &Alm) -> Result<ScaleCoefficients, WaveletError> {
        self.check_band_limit(flm.layout().band_limit())?;
        let columns = self
            .kernels()
            .iter()
            .map(|kernel| {
                let mut column = flm.clone();
                column.scale_by_degree(|l| kernel[l]);
                column
            })
            .collect();
        Ok(ScaleCoefficients::from_columns(columns))
    }

    /// Recombines a scale table into harmonic coefficients.
    ///
    /// Computes `sum_c kappa_c(l) * w_c,lm`; exact inverse of
    /// [`analysis`](Self::analysis).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::ColumnCountMismatch`] | table width differs from [`n_scales`](Self::n_scales) |
    /// | [`WaveletError::Healpix`] | table band limit differs from the tiling's |
    pub fn synthesis(&self, table: &ScaleCoefficients) -> Result<Alm, WaveletError> {
        if table.n_scales() != self.n_scales() {
            return Err(WaveletError::ColumnCountMismatch {
                expected: self.n_scales(),
                got: table.n_scales(),
            });
        }
        let layout = table.layout();
        self.check_band_limit(layout.band_limit())?;
        let mut flm = Alm::zeros(layout);
        for (kernel, column) in self.kernels().iter().zip(table.iter()) {
            flm.add_scaled(column, |l| kernel[l])?;
        }
        Ok(flm)
    }

    fn check_band_limit(&self, band_limit: usize) -> Result<(), WaveletError> {
        if band_limit != self.band_limit() {
            return Err(HealpixError::BandLimitMismatch {
                expected: self.band_limit(),
                got: band_limit,
            }
            .into());
        }
        Ok(())
    }
}

//! Scale-indexed harmonic coefficient tables.

use tomos2n_healpix::{Alm, AlmLayout};

use crate::error::WaveletError;

/// One [`Alm`] column per scale: column 0 is the scaling function, the
/// remaining columns are the wavelet scales in increasing order.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleCoefficients {
    columns: Vec<Alm>,
}

impl ScaleCoefficients {
    /// All-zero table with `n_scales` columns.
    pub fn zeros(layout: AlmLayout, n_scales: usize) -> Self {
        Self {
            columns: vec![Alm::zeros(layout); n_scales],
        }
    }

    pub(crate) fn from_columns(columns: Vec<Alm>) -> Self {
        Self { columns }
    }

    /// Number of columns, scaling function included.
    pub fn n_scales(&self) -> usize {
        self.columns.len()
    }

    /// Coefficient layout shared by every column.
    ///
    /// # Panics
    ///
    /// Panics if the table has no columns.
    pub fn layout(&self) -> AlmLayout {
        self.columns[0].layout()
    }

    /// Scaling-function coefficients (column 0).
    pub fn scaling(&self) -> &Alm {
        &self.columns[0]
    }

    /// Returns column `column`.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::ColumnOutOfRange`] if `column >= n_scales()`.
    pub fn column(&self, column: usize) -> Result<&Alm, WaveletError> {
        let n_columns = self.columns.len();
        self.columns
            .get(column)
            .ok_or(WaveletError::ColumnOutOfRange { column, n_columns })
    }

    /// Replaces column `column` with `alm`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::ColumnOutOfRange`] | `column >= n_scales()` |
    /// | [`WaveletError::Healpix`] | `alm` uses a different layout |
    pub fn replace(&mut self, column: usize, alm: Alm) -> Result<(), WaveletError> {
        let n_columns = self.columns.len();
        let layout = self.layout();
        let slot = self
            .columns
            .get_mut(column)
            .ok_or(WaveletError::ColumnOutOfRange { column, n_columns })?;
        if alm.layout() != layout {
            return Err(tomos2n_healpix::HealpixError::BandLimitMismatch {
                expected: layout.band_limit(),
                got: alm.layout().band_limit(),
            }
            .into());
        }
        *slot = alm;
        Ok(())
    }

    /// Iterates over the columns in order.
    pub fn iter(&self) -> impl Iterator<Item = &Alm> {
        self.columns.iter()
    }
}

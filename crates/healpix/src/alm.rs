//! Triangular storage of spherical harmonic coefficients.

use num_complex::Complex64;

use crate::error::HealpixError;

/// Flat index layout for coefficients `a_lm` with `0 <= m <= l < L`.
///
/// Coefficients are stored m-major: all degrees for `m = 0`, then all
/// degrees for `m = 1`, and so on. The flat index of `(l, m)` is
/// `m * (2L - 1 - m) / 2 + l`, and the layout holds `L * (L + 1) / 2`
/// entries.
///
/// # Example
///
/// ```
/// use tomos2n_healpix::AlmLayout;
///
/// let layout = AlmLayout::new(4).unwrap();
/// assert_eq!(layout.size(), 10);
/// assert_eq!(layout.index(0, 0).unwrap(), 0);
/// assert_eq!(layout.index(1, 1).unwrap(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlmLayout {
    band_limit: usize,
}

impl AlmLayout {
    /// Creates a layout for band limit `L` (degrees `0..L`).
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::ZeroBandLimit`] if `band_limit == 0`.
    pub fn new(band_limit: usize) -> Result<Self, HealpixError> {
        if band_limit == 0 {
            return Err(HealpixError::ZeroBandLimit);
        }
        Ok(Self { band_limit })
    }

    /// Returns the band limit `L`.
    pub fn band_limit(&self) -> usize {
        self.band_limit
    }

    /// Returns the largest stored degree, `L - 1`.
    pub fn lmax(&self) -> usize {
        self.band_limit - 1
    }

    /// Number of stored coefficients.
    pub fn size(&self) -> usize {
        self.band_limit * (self.band_limit + 1) / 2
    }

    /// Flat index of `(l, m)`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`HealpixError::DegreeOutOfRange`] | `l >= L` |
    /// | [`HealpixError::OrderOutOfRange`] | `m > l` |
    pub fn index(&self, l: usize, m: usize) -> Result<usize, HealpixError> {
        if l >= self.band_limit {
            return Err(HealpixError::DegreeOutOfRange {
                l,
                band_limit: self.band_limit,
            });
        }
        if m > l {
            return Err(HealpixError::OrderOutOfRange { l, m });
        }
        Ok(self.offset(l, m))
    }

    /// Index without bounds checks; callers guarantee `m <= l < L`.
    pub(crate) fn offset(&self, l: usize, m: usize) -> usize {
        // m * (2L - 1 - m) is a product of two integers of opposite parity.
        m * (2 * self.band_limit - 1 - m) / 2 + l
    }

    /// Iterates over `(l, m)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let band_limit = self.band_limit;
        (0..band_limit).flat_map(move |m| (m..band_limit).map(move |l| (l, m)))
    }
}

/// Spherical harmonic coefficients of a real field, `m >= 0` only.
#[derive(Clone, Debug, PartialEq)]
pub struct Alm {
    layout: AlmLayout,
    coeffs: Vec<Complex64>,
}

impl Alm {
    /// All-zero coefficients for `layout`.
    pub fn zeros(layout: AlmLayout) -> Self {
        Self {
            layout,
            coeffs: vec![Complex64::new(0.0, 0.0); layout.size()],
        }
    }

    /// Wraps a coefficient vector.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::LengthMismatch`] if `coeffs.len() != layout.size()`.
    pub fn from_vec(layout: AlmLayout, coeffs: Vec<Complex64>) -> Result<Self, HealpixError> {
        if coeffs.len() != layout.size() {
            return Err(HealpixError::LengthMismatch {
                expected: layout.size(),
                got: coeffs.len(),
            });
        }
        Ok(Self { layout, coeffs })
    }

    /// Returns the storage layout.
    pub fn layout(&self) -> AlmLayout {
        self.layout
    }

    /// Returns the coefficient at `(l, m)`.
    ///
    /// # Errors
    ///
    /// Propagates index errors from [`AlmLayout::index`].
    pub fn get(&self, l: usize, m: usize) -> Result<Complex64, HealpixError> {
        Ok(self.coeffs[self.layout.index(l, m)?])
    }

    /// Sets the coefficient at `(l, m)`.
    ///
    /// # Errors
    ///
    /// Propagates index errors from [`AlmLayout::index`].
    pub fn set(&mut self, l: usize, m: usize, value: Complex64) -> Result<(), HealpixError> {
        let i = self.layout.index(l, m)?;
        self.coeffs[i] = value;
        Ok(())
    }

    /// Returns the coefficients in storage order.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.coeffs
    }

    /// Returns the coefficients mutably.
    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.coeffs
    }

    /// Multiplies every `a_lm` by `weight(l)`.
    pub fn scale_by_degree(&mut self, weight: impl Fn(usize) -> f64) {
        for ((l, _), c) in self.layout.iter().zip(self.coeffs.iter_mut()) {
            *c *= weight(l);
        }
    }

    /// Adds `other` scaled per degree by `weight(l)` into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`HealpixError::BandLimitMismatch`] if the layouts differ.
    pub fn add_scaled(
        &mut self,
        other: &Alm,
        weight: impl Fn(usize) -> f64,
    ) -> Result<(), HealpixError> {
        if other.layout != self.layout {
            return Err(HealpixError::BandLimitMismatch {
                expected: self.layout.band_limit(),
                got: other.layout.band_limit(),
            });
        }
        for (((l, _), c), o) in self
            .layout
            .iter()
            .zip(self.coeffs.iter_mut())
            .zip(&other.coeffs)
        {
            *c += *o * weight(l);
        }
        Ok(())
    }

    /// Angular power spectrum `C_l` of a real field.
    ///
    /// `C_l = (|a_l0|^2 + 2 * sum_{m>0} |a_lm|^2) / (2l + 1)`.
    pub fn power_spectrum(&self) -> Vec<f64> {
        let mut cl = vec![0.0; self.layout.band_limit()];
        for ((l, m), c) in self.layout.iter().zip(&self.coeffs) {
            let weight = if m == 0 { 1.0 } else { 2.0 };
            cl[l] += weight * c.norm_sqr();
        }
        for (l, v) in cl.iter_mut().enumerate() {
            *v /= (2 * l + 1) as f64;
        }
        cl
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn index_is_injective_and_bounded() {
        for band_limit in 1..20 {
            let layout = AlmLayout::new(band_limit).unwrap();
            let mut seen = HashSet::new();
            for l in 0..band_limit {
                for m in 0..=l {
                    let i = layout.index(l, m).unwrap();
                    assert!(i < layout.size(), "L={band_limit} ({l},{m}) -> {i}");
                    assert!(seen.insert(i), "duplicate index {i} for L={band_limit}");
                }
            }
            assert_eq!(seen.len(), layout.size());
        }
    }

    #[test]
    fn index_matches_formula() {
        let layout = AlmLayout::new(35).unwrap();
        assert_eq!(layout.index(0, 0).unwrap(), 0);
        assert_eq!(layout.index(34, 0).unwrap(), 34);
        assert_eq!(layout.index(1, 1).unwrap(), 35);
        assert_eq!(layout.index(34, 34).unwrap(), layout.size() - 1);
    }

    #[test]
    fn index_out_of_range() {
        let layout = AlmLayout::new(4).unwrap();
        assert_eq!(
            layout.index(4, 0),
            Err(HealpixError::DegreeOutOfRange {
                l: 4,
                band_limit: 4
            })
        );
        assert_eq!(
            layout.index(2, 3),
            Err(HealpixError::OrderOutOfRange { l: 2, m: 3 })
        );
    }

    #[test]
    fn zero_band_limit_rejected() {
        assert_eq!(AlmLayout::new(0), Err(HealpixError::ZeroBandLimit));
    }

    #[test]
    fn iter_follows_storage_order() {
        let layout = AlmLayout::new(6).unwrap();
        for (i, (l, m)) in layout.iter().enumerate() {
            assert_eq!(layout.index(l, m).unwrap(), i);
        }
        assert_eq!(layout.iter().count(), layout.size());
    }

    #[test]
    fn from_vec_checks_length() {
        let layout = AlmLayout::new(3).unwrap();
        assert!(Alm::from_vec(layout, vec![Complex64::new(0.0, 0.0); 6]).is_ok());
        assert!(Alm::from_vec(layout, vec![Complex64::new(0.0, 0.0); 5]).is_err());
    }

    #[test]
    fn power_spectrum_counts_negative_orders() {
        let layout = AlmLayout::new(3).unwrap();
        let mut alm = Alm::zeros(layout);
        alm.set(2, 0, Complex64::new(1.0, 0.0)).unwrap();
        alm.set(2, 1, Complex64::new(0.0, 2.0)).unwrap();
        alm.set(2, 2, Complex64::new(1.0, 1.0)).unwrap();
        let cl = alm.power_spectrum();
        assert_eq!(cl.len(), 3);
        assert_relative_eq!(cl[2], (1.0 + 2.0 * 4.0 + 2.0 * 2.0) / 5.0, epsilon = 1e-12);
        assert_eq!(cl[0], 0.0);
    }

    #[test]
    fn add_scaled_weights_by_degree() {
        let layout = AlmLayout::new(3).unwrap();
        let mut acc = Alm::zeros(layout);
        let mut other = Alm::zeros(layout);
        other.set(1, 1, Complex64::new(2.0, -1.0)).unwrap();
        acc.add_scaled(&other, |l| l as f64 * 0.5).unwrap();
        assert_eq!(acc.get(1, 1).unwrap(), Complex64::new(1.0, -0.5));

        let mismatched = Alm::zeros(AlmLayout::new(4).unwrap());
        assert!(acc.add_scaled(&mismatched, |_| 1.0).is_err());
    }
}

//! Map-space to scale-space bridge over the transform collaborators.

use std::collections::BTreeSet;

use ndarray::{Array2, ArrayView1};
use tomos2n_healpix::{
    Alm, AlmLayout, DirectTransform, Nside, SphericalMap, SphericalTransform,
};
use tomos2n_wavelet::{AxisymTiling, ScaleCoefficients};
use tracing::trace_span;

use crate::error::RealiseError;
use crate::params::RunParams;

/// Angular power spectra of the scale columns, stored `L x n_scales`.
///
/// Only simulated columns are estimated; the others stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    values: Array2<f64>,
}

impl PowerSpectrum {
    /// All-zero spectra.
    pub fn zeros(band_limit: usize, n_scales: usize) -> Self {
        Self {
            values: Array2::zeros((band_limit, n_scales)),
        }
    }

    /// Returns the number of degrees per column.
    pub fn band_limit(&self) -> usize {
        self.values.nrows()
    }

    /// Returns the number of scale columns.
    pub fn n_scales(&self) -> usize {
        self.values.ncols()
    }

    /// Spectrum of scale column `scale`, or `None` if out of range.
    pub fn column(&self, scale: usize) -> Option<ArrayView1<'_, f64>> {
        (scale < self.n_scales()).then(|| self.values.column(scale))
    }

    /// Returns the full `L x n_scales` table.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }
}

/// Wavelet decomposition of one input map.
#[derive(Debug, Clone)]
pub struct Decomposition {
    wavelets: ScaleCoefficients,
    power: PowerSpectrum,
}

impl Decomposition {
    /// Scaling-function coefficients (column 0 of the scale table).
    pub fn scaling(&self) -> &Alm {
        self.wavelets.scaling()
    }

    /// Full scale table, scaling function included.
    pub fn wavelets(&self) -> &ScaleCoefficients {
        &self.wavelets
    }

    /// Per-scale power spectra of the simulated columns.
    pub fn power(&self) -> &PowerSpectrum {
        &self.power
    }
}

/// Couples a spherical harmonic transform with an axisymmetric wavelet
/// tiling at a fixed `(Nside, L, B, J_min)`.
///
/// Transform diagnostics are emitted as `trace` events inside spans named
/// after the bridge operation.
#[derive(Debug, Clone)]
pub struct WaveletBridge<T = DirectTransform> {
    transform: T,
    tiling: AxisymTiling,
    nside: Nside,
    layout: AlmLayout,
}

impl WaveletBridge<DirectTransform> {
    /// Bridge over the direct-summation transform.
    ///
    /// # Errors
    ///
    /// Returns [`RealiseError::Wavelet`] if the tiling cannot be built.
    pub fn new(params: &RunParams) -> Result<Self, RealiseError> {
        let transform = DirectTransform::new(params.nside(), params.layout());
        Self::with_transform(params, transform)
    }
}

impl<T: SphericalTransform> WaveletBridge<T> {
    /// Bridge over a caller-supplied transform.
    ///
    /// # Errors
    ///
    /// Returns [`RealiseError::Wavelet`] if the tiling cannot be built.
    pub fn with_transform(params: &RunParams, transform: T) -> Result<Self, RealiseError> {
        let tiling = AxisymTiling::new(params.band_limit(), params.dilation(), params.j_min())?;
        Ok(Self {
            transform,
            tiling,
            nside: params.nside(),
            layout: params.layout(),
        })
    }

    /// Returns the wavelet tiling.
    pub fn tiling(&self) -> &AxisymTiling {
        &self.tiling
    }

    /// Returns the map resolution.
    pub fn nside(&self) -> Nside {
        self.nside
    }

    /// Returns the harmonic layout.
    pub fn layout(&self) -> AlmLayout {
        self.layout
    }

    /// Decomposes `map` into scale columns and estimates the power
    /// spectrum of every simulated column from its map-space rendering.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`RealiseError::MapResolution`] | `map` is not at the bridge's `Nside` |
    /// | [`RealiseError::Healpix`] | transform size mismatch |
    /// | [`RealiseError::Wavelet`] | a simulated column is outside the table |
    pub fn analyze(
        &self,
        map: &SphericalMap,
        params: &RunParams,
    ) -> Result<Decomposition, RealiseError> {
        self.check_map(map)?;
        let _span = trace_span!("analyze", npix = map.npix()).entered();

        let flm = self.transform.map2alm(map, self.layout)?;
        let wavelets = self.tiling.analysis(&flm)?;

        let mut power = PowerSpectrum::zeros(self.layout.band_limit(), wavelets.n_scales());
        let selected: BTreeSet<usize> = params.simscales().iter().copied().collect();
        for scale in selected {
            let scale_map = self.transform.alm2map(wavelets.column(scale)?, self.nside)?;
            let cl = self.transform.anafast(&scale_map, self.layout)?;
            power
                .values
                .column_mut(scale)
                .assign(&ArrayView1::from(&cl[..]));
        }
        Ok(Decomposition { wavelets, power })
    }

    /// Recombines a scale table into harmonic coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`RealiseError::Wavelet`] if the table does not fit the tiling.
    pub fn synthesize(&self, wavelets: &ScaleCoefficients) -> Result<Alm, RealiseError> {
        let _span = trace_span!("synthesize", n_scales = wavelets.n_scales()).entered();
        Ok(self.tiling.synthesis(wavelets)?)
    }

    /// Renders harmonic coefficients as a map at the bridge's `Nside`.
    ///
    /// # Errors
    ///
    /// Returns [`RealiseError::Healpix`] if `alm` uses a different band limit.
    pub fn to_map(&self, alm: &Alm) -> Result<SphericalMap, RealiseError> {
        let _span = trace_span!("to_map", nside = self.nside.get()).entered();
        Ok(self.transform.alm2map(alm, self.nside)?)
    }

    pub(crate) fn check_map(&self, map: &SphericalMap) -> Result<(), RealiseError> {
        if map.nside() != self.nside {
            return Err(RealiseError::MapResolution {
                expected: self.nside.get(),
                got: map.nside().get(),
            });
        }
        Ok(())
    }
}

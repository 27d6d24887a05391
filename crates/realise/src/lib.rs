//! # tomos2n-realise
//!
//! Random realisations of a spherical map in wavelet space.
//!
//! A map is decomposed into axisymmetric wavelet scales; the selected scales
//! are replaced by Gaussian-like random fields carrying the same angular
//! power, and the result is resynthesised. Repeating this builds an
//! ensemble whose last member is the untouched input.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["SphericalMap"] -->|"bridge.analyze(&map, &params)?"| B["Decomposition"]
//!     B -->|"generate_scale_alm(cl, ..)"| C["random Alm per scale"]
//!     C -->|"splice + synthesize + to_map"| D["simulated map"]
//!     D -->|"x nmaps, original last"| E["Array2 ensemble"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tomos2n_healpix::{Nside, SphericalMap};
//! use tomos2n_realise::{RunParams, ScaleSelection, WaveletBridge, build_ensemble};
//!
//! let params = RunParams::new(Nside::new(1)?, 4, 2.0, 0, &ScaleSelection::default())?
//!     .with_nmaps(3);
//! let map = SphericalMap::new(params.nside(), (0..12).map(f64::from).collect())?;
//! let bridge = WaveletBridge::new(&params)?;
//! let decomposition = bridge.analyze(&map, &params)?;
//! let mut rng = StdRng::seed_from_u64(1);
//! let ensemble = build_ensemble(&map, &decomposition, &bridge, &params, &mut rng, false)?;
//! assert_eq!(ensemble.dim(), (4, 12));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bridge;
mod ensemble;
mod error;
mod generator;
mod params;

pub use bridge::{Decomposition, PowerSpectrum, WaveletBridge};
pub use ensemble::build_ensemble;
pub use error::RealiseError;
pub use generator::generate_scale_alm;
pub use params::{DrawScheme, RunParams, ScaleSelection};

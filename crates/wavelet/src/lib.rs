//! # tomos2n-wavelet
//!
//! Axisymmetric scale-discretised wavelets on the sphere, applied directly
//! to spherical harmonic coefficients.
//!
//! ## Analysis Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["Alm"] -->|"tiling.analysis(&flm)?"| B["ScaleCoefficients"]
//!     B -->|".replace(column, alm)?"| B
//!     B -->|"tiling.synthesis(&table)?"| A
//! ```
//!
//! ## Scale Table Layout
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | scaling function (low-pass) |
//! | 1 | wavelet scale `j_min` |
//! | ... | ... |
//! | `n_scales - 1` | wavelet scale `j_max = ceil(ln L / ln B)` |
//!
//! ## Quick Start
//!
//! ```
//! use tomos2n_healpix::{Alm, AlmLayout};
//! use tomos2n_wavelet::AxisymTiling;
//!
//! let tiling = AxisymTiling::new(16, 2.0, 0)?;
//! let flm = Alm::zeros(AlmLayout::new(16)?);
//! let table = tiling.analysis(&flm)?;
//! let back = tiling.synthesis(&table)?;
//! assert_eq!(back, flm);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod axisym;
mod error;
mod scales;
mod tiling;

pub use error::WaveletError;
pub use scales::ScaleCoefficients;
pub use tiling::{AxisymTiling, MAX_J, j_max, n_scales};

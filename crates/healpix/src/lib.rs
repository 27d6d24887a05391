//! # tomos2n-healpix
//!
//! HEALPix RING pixelisation, triangular spherical harmonic storage and a
//! direct-summation spherical harmonic transform.
//!
//! ## Transform Round Trip
//!
//! ```mermaid
//! graph LR
//!     A["SphericalMap"] -->|"map2alm(&map, layout)?"| B["Alm"]
//!     B -->|"alm2map(&alm, nside)?"| A
//!     B -->|".power_spectrum()"| C["C_l"]
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tomos2n_healpix::{AlmLayout, DirectTransform, Nside, SphericalMap, SphericalTransform};
//!
//! let nside = Nside::new(2)?;
//! let layout = AlmLayout::new(4)?;
//! let transform = DirectTransform::new(nside, layout);
//!
//! let map = SphericalMap::filled(nside, 1.0);
//! let alm = transform.map2alm(&map, layout)?;
//! let back = transform.alm2map(&alm, nside)?;
//! assert_eq!(back.npix(), 48);
//! # Ok::<(), tomos2n_healpix::HealpixError>(())
//! ```

mod alm;
mod error;
mod map;
mod nside;
mod transform;

pub use alm::{Alm, AlmLayout};
pub use error::HealpixError;
pub use map::{SphericalMap, UNSEEN};
pub use nside::{Nside, Ring};
pub use transform::{DirectTransform, SphericalTransform};

/// Complex coefficient type used throughout the workspace.
pub use num_complex::Complex64;

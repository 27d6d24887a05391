//! # tomos2n-stats
//!
//! Summary maps and signal-to-noise reductions over an ensemble of maps
//! whose last member is the real map.
//!
//! | Quantity | Definition |
//! |----------|------------|
//! | mean map | per-pixel mean over members |
//! | error map | per-pixel population standard deviation over members |
//! | global S2N | per member, mean over pixels of `member / error` |
//! | local S2N | global S2N restricted to pixels with `mask != 1` |
//!
//! Pixels with zero error are skipped; a reduction with no usable pixel
//! yields [`UNSEEN`](tomos2n_healpix::UNSEEN).
//!
//! ## Quick Start
//!
//! ```
//! use ndarray::array;
//! use tomos2n_stats::S2nStats;
//!
//! let stats = S2nStats::new(array![[0.0, 1.0], [2.0, 3.0]])?;
//! let global = stats.global_s2n();
//! assert_eq!(global.len(), 2);
//! let local = stats.local_s2n(&[0.0, 1.0])?;
//! assert_eq!(local[1], 2.0);
//! # Ok::<(), tomos2n_stats::StatsError>(())
//! ```

mod error;
mod s2n;

pub use error::StatsError;
pub use s2n::S2nStats;

//! # tomos2n-io
//!
//! File formats at the edges of a tomos2n run: HEALPix maps in Parquet,
//! region masks named by a manifest, S2N sequences in binary or text, and
//! scattered samples gridded onto a map.
//!
//! | Item | Format |
//! |------|--------|
//! | map, mask | Parquet, columns `pixel: UInt64`, `value: Float64`, metadata `nside`, `ordering` |
//! | region list | `manifest.toml` in the mask directory |
//! | S2N sequence | little-endian `f64` or `%.18e` text lines |
//! | samples | whitespace-separated `lon lat value` text |

mod error;
mod map_file;
mod masks;
mod outputs;
mod pixelise;
mod s2n_file;

pub use error::IoError;
pub use map_file::{Compression, WriterConfig, read_map, write_map};
pub use masks::{LOCATIONS, MANIFEST_FILE, MaskStore, Region, RegionSelection};
pub use outputs::OutputLayout;
pub use pixelise::{Sample, parse_samples, pixelise, read_samples};
pub use s2n_file::{S2nFormat, read_s2n, write_s2n};

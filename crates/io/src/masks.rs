//! Region masks and the manifest that names them.
//!
//! A mask directory holds one map file per region plus an optional
//! `manifest.toml`:
//!
//! ```toml
//! [[region]]
//! name = "8_tile_0001"
//! tile_size = 8
//! file = "8_tile_0001.parquet"   # optional
//! ```
//!
//! Without a manifest, tiles are discovered from files named
//! `{tile_size}_tile_{index:04}.parquet`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tomos2n_healpix::SphericalMap;
use tracing::{debug, warn};

use crate::error::IoError;
use crate::map_file::read_map;

/// File name of the region manifest inside a mask directory.
pub const MANIFEST_FILE: &str = "manifest.toml";

/// Region names that would collide with the run's own outputs.
const RESERVED_NAMES: [&str; 1] = ["global"];

/// Named locations evaluated in locations-only mode.
pub const LOCATIONS: [&str; 22] = [
    "afar",
    "australia",
    "brazilcoast",
    "canaries",
    "capeverde",
    "comoros",
    "eastpacificrise",
    "everest",
    "greenland",
    "hawaii",
    "iceland",
    "macdonald",
    "marquesas",
    "midatalanticridge",
    "namibia",
    "pitcairn",
    "richardsdeep",
    "russia",
    "samoa",
    "southernocean",
    "tahiti",
    "yellowstone",
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    region: Vec<RegionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegionEntry {
    name: String,
    tile_size: Option<u32>,
    file: Option<PathBuf>,
}

/// One region mask known to a [`MaskStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    name: String,
    file: PathBuf,
    tile_size: Option<u32>,
}

impl Region {
    /// Returns the region name, used as the output file stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the mask file path, relative to the mask directory.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the tile size in degrees, for tiled regions.
    pub fn tile_size(&self) -> Option<u32> {
        self.tile_size
    }
}

/// Which regions a run evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSelection {
    /// Every manifest tile of the given size, in degrees.
    Tiles(u32),
    /// The fixed list of [`LOCATIONS`].
    Locations,
}

/// Read-only access to the region masks in one directory.
#[derive(Debug, Clone)]
pub struct MaskStore {
    dir: PathBuf,
    regions: Vec<Region>,
}

impl MaskStore {
    /// Opens `dir`, reading `manifest.toml` when present.
    ///
    /// Without a manifest the directory is scanned for tile files; a
    /// missing directory yields an empty store, so location masks fail
    /// only when loaded.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`IoError::Io`] | the manifest or directory exists but cannot be read |
    /// | [`IoError::Manifest`] | invalid TOML, or a bad or duplicate region name |
    pub fn open(dir: &Path) -> Result<Self, IoError> {
        let manifest = dir.join(MANIFEST_FILE);
        let regions = if manifest.exists() {
            let text =
                std::fs::read_to_string(&manifest).map_err(|e| IoError::io(&manifest, e))?;
            parse_manifest(&text).map_err(|reason| IoError::Manifest {
                path: manifest.clone(),
                reason,
            })?
        } else {
            let tiles = scan_tiles(dir)?;
            warn!(
                dir = %dir.display(),
                n_tiles = tiles.len(),
                "no region manifest found, using tile files"
            );
            tiles
        };
        debug!(dir = %dir.display(), n_regions = regions.len(), "opened mask store");
        Ok(Self {
            dir: dir.to_path_buf(),
            regions,
        })
    }

    /// Returns the mask directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every region listed in the manifest, in manifest order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Manifest tiles of `tile_size` degrees, ordered by name.
    pub fn tiles(&self, tile_size: u32) -> Vec<Region> {
        let mut tiles: Vec<Region> = self
            .regions
            .iter()
            .filter(|r| r.tile_size == Some(tile_size))
            .cloned()
            .collect();
        tiles.sort_by(|a, b| a.name.cmp(&b.name));
        tiles
    }

    /// The named [`LOCATIONS`], taken from the manifest when listed there
    /// and otherwise mapped to `<name>.parquet`.
    pub fn locations(&self) -> Vec<Region> {
        LOCATIONS
            .iter()
            .map(|&name| {
                self.regions
                    .iter()
                    .find(|r| r.name == name)
                    .cloned()
                    .unwrap_or_else(|| Region {
                        name: name.to_string(),
                        file: default_file(name),
                        tile_size: None,
                    })
            })
            .collect()
    }

    /// Regions for `selection`.
    pub fn select(&self, selection: RegionSelection) -> Vec<Region> {
        match selection {
            RegionSelection::Tiles(size) => self.tiles(size),
            RegionSelection::Locations => self.locations(),
        }
    }

    /// Reads the mask of `region`.
    ///
    /// # Errors
    ///
    /// Propagates [`read_map`] errors.
    pub fn load(&self, region: &Region) -> Result<SphericalMap, IoError> {
        read_map(&self.dir.join(&region.file))
    }
}

fn default_file(name: &str) -> PathBuf {
    PathBuf::from(format!("{name}.parquet"))
}

/// Tile regions from `{size}_tile_{index:04}.parquet` files in `dir`.
fn scan_tiles(dir: &Path) -> Result<Vec<Region>, IoError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IoError::io(dir, e))?;
    let mut tiles = Vec::new();
    for entry in entries {
        let file = entry.map_err(|e| IoError::io(dir, e))?.file_name();
        let Some(name) = file.to_str().and_then(|f| f.strip_suffix(".parquet")) else {
            continue;
        };
        if let Some(tile_size) = parse_tile_name(name) {
            tiles.push(Region {
                name: name.to_string(),
                file: PathBuf::from(&file),
                tile_size: Some(tile_size),
            });
        }
    }
    Ok(tiles)
}

/// Tile size encoded in a `{size}_tile_{index:04}` name.
fn parse_tile_name(name: &str) -> Option<u32> {
    let (size, index) = name.split_once("_tile_")?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(size) || index.len() != 4 || !digits(index) {
        return None;
    }
    size.parse().ok()
}

/// Region names become output file stems, so they must stay inside the
/// output directory and clear of the run's own files.
fn check_region_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("region with empty name".to_string());
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(format!("region name '{name}' is reserved"));
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(format!("region name '{name}' is not a plain file stem"));
    }
    Ok(())
}

fn parse_manifest(text: &str) -> Result<Vec<Region>, String> {
    let parsed: ManifestFile = toml::from_str(text).map_err(|e| e.to_string())?;
    let mut regions = Vec::with_capacity(parsed.region.len());
    for entry in parsed.region {
        check_region_name(&entry.name)?;
        if regions.iter().any(|r: &Region| r.name == entry.name) {
            return Err(format!("duplicate region '{}'", entry.name));
        }
        let file = entry.file.unwrap_or_else(|| default_file(&entry.name));
        regions.push(Region {
            name: entry.name,
            file,
            tile_size: entry.tile_size,
        });
    }
    Ok(regions)
}

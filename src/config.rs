use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "tomos2n.toml";

/// Top-level tomos2n configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tomos2nConfig {
    /// Global RNG seed; file `i` uses `seed + i`.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Input map files, processed in order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Wavelet transform settings.
    #[serde(default)]
    pub transform: TransformToml,

    /// Ensemble settings.
    #[serde(default)]
    pub ensemble: EnsembleToml,

    /// Region mask settings.
    #[serde(default)]
    pub regions: RegionsToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,

    /// File-level parallelism.
    #[serde(default)]
    pub parallel: ParallelToml,
}

impl Tomos2nConfig {
    /// Loads `path`, or [`DEFAULT_CONFIG`] when `path` is `None`.
    ///
    /// A missing default file yields the built-in defaults; a missing file
    /// that was named explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformToml {
    #[serde(default = "default_l")]
    pub l: usize,
    #[serde(default = "default_b")]
    pub b: f64,
    #[serde(default = "default_j_min")]
    pub j_min: usize,
    #[serde(default = "default_simscales")]
    pub simscales: Vec<i64>,
    #[serde(default = "default_draw")]
    pub draw: String,
}

impl Default for TransformToml {
    fn default() -> Self {
        Self {
            l: default_l(),
            b: default_b(),
            j_min: default_j_min(),
            simscales: default_simscales(),
            draw: default_draw(),
        }
    }
}

fn default_l() -> usize {
    35
}
fn default_b() -> f64 {
    1.5
}
fn default_j_min() -> usize {
    2
}
fn default_simscales() -> Vec<i64> {
    vec![-1]
}
fn default_draw() -> String {
    "reference".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleToml {
    #[serde(default = "default_nmaps")]
    pub nmaps: usize,
}

impl Default for EnsembleToml {
    fn default() -> Self {
        Self {
            nmaps: default_nmaps(),
        }
    }
}

fn default_nmaps() -> usize {
    500
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionsToml {
    #[serde(default = "default_mask_dir")]
    pub mask_dir: PathBuf,
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default)]
    pub locations_only: bool,
}

impl Default for RegionsToml {
    fn default() -> Self {
        Self {
            mask_dir: default_mask_dir(),
            tile_size: default_tile_size(),
            locations_only: false,
        }
    }
}

fn default_mask_dir() -> PathBuf {
    PathBuf::from("masks")
}
fn default_tile_size() -> u32 {
    8
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub save_summary_maps: bool,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_format(),
            save_summary_maps: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}
fn default_format() -> String {
    "binary".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelToml {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for ParallelToml {
    fn default() -> Self {
        Self {
            enabled: false,
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    4
}

//! Pure conversion functions: TOML config structs -> run configuration.

use anyhow::{Result, bail};

use tomos2n_io::{OutputLayout, RegionSelection, S2nFormat};
use tomos2n_realise::{DrawScheme, ScaleSelection};
use tomos2n_wavelet::n_scales;

use crate::config::Tomos2nConfig;
use crate::run::RunConfig;

/// Parses a draw scheme name into the corresponding enum variant.
pub fn parse_draw_scheme(s: &str) -> Result<DrawScheme> {
    match s.to_lowercase().as_str() {
        "reference" => Ok(DrawScheme::Reference),
        "gaussian" => Ok(DrawScheme::Gaussian),
        other => bail!("unknown draw scheme: {other:?}"),
    }
}

/// Parses an S2N output format name into the corresponding enum variant.
pub fn parse_format(s: &str) -> Result<S2nFormat> {
    match s.to_lowercase().as_str() {
        "binary" => Ok(S2nFormat::Binary),
        "text" => Ok(S2nFormat::Text),
        other => bail!("unknown output format: {other:?}"),
    }
}

/// Builds a validated [`RunConfig`] from the TOML configuration.
///
/// The `(L, B, J_min)` triple and the scale selection are checked here, so
/// a bad configuration fails before any file is read.
pub fn build_run_config(config: &Tomos2nConfig) -> Result<RunConfig> {
    let t = &config.transform;
    let n_scales = n_scales(t.l, t.b, t.j_min)?;
    let selection = ScaleSelection::new(t.simscales.clone());
    selection.resolve(n_scales)?;

    if config.parallel.workers == 0 {
        bail!("parallel.workers must be at least 1");
    }

    let regions = if config.regions.locations_only {
        RegionSelection::Locations
    } else {
        RegionSelection::Tiles(config.regions.tile_size)
    };

    Ok(RunConfig {
        band_limit: t.l,
        dilation: t.b,
        j_min: t.j_min,
        selection,
        nmaps: config.ensemble.nmaps,
        draw: parse_draw_scheme(&t.draw)?,
        seed: config.seed,
        mask_dir: config.regions.mask_dir.clone(),
        regions,
        outputs: OutputLayout::new(config.output.dir.clone()),
        format: parse_format(&config.output.format)?,
        save_summary_maps: config.output.save_summary_maps,
        parallel: config.parallel.enabled,
        workers: config.parallel.workers,
    })
}

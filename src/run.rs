//! Run command: per-file S2N pipeline and the file-level worker pool.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, error, info, info_span, warn};

use tomos2n_healpix::SphericalMap;
use tomos2n_io::{
    MaskStore, OutputLayout, RegionSelection, S2nFormat, WriterConfig, read_map, write_map,
    write_s2n,
};
use tomos2n_realise::{DrawScheme, RunParams, ScaleSelection, WaveletBridge, build_ensemble};
use tomos2n_stats::{S2nStats, StatsError};

use crate::cli::RunArgs;
use crate::config::Tomos2nConfig;
use crate::convert;

/// Validated settings shared by every input file of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub band_limit: usize,
    pub dilation: f64,
    pub j_min: usize,
    pub selection: ScaleSelection,
    pub nmaps: usize,
    pub draw: DrawScheme,
    pub seed: Option<u64>,
    pub mask_dir: PathBuf,
    pub regions: RegionSelection,
    pub outputs: OutputLayout,
    pub format: S2nFormat,
    pub save_summary_maps: bool,
    pub parallel: bool,
    pub workers: usize,
}

/// What one input file produced.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub index: usize,
    pub n_regions: usize,
    /// S2N of the real map (last ensemble member).
    pub global_s2n: f64,
    pub written: Vec<PathBuf>,
}

/// Run the S2N pipeline over every input file.
pub fn run(args: RunArgs) -> Result<()> {
    let mut config = Tomos2nConfig::load(args.config.as_deref())?;

    // CLI overrides
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output.dir = output;
    }
    if args.text {
        config.output.format = "text".to_string();
    }
    if args.parallel {
        config.parallel.enabled = true;
    }
    if let Some(workers) = args.workers {
        config.parallel.workers = workers;
    }
    if !args.files.is_empty() {
        config.inputs = args.files;
    }

    if config.inputs.is_empty() {
        bail!("no input files: list them in `inputs` or pass them on the command line");
    }
    let run_config = convert::build_run_config(&config)?;
    std::fs::create_dir_all(run_config.outputs.dir()).with_context(|| {
        format!(
            "failed to create output directory: {}",
            run_config.outputs.dir().display()
        )
    })?;

    run_all(&config.inputs, &run_config)
}

/// Processes `files` with 1-based indices in input order.
///
/// A failing file is logged and does not stop the others; the returned
/// error counts the failures.
pub fn run_all(files: &[PathBuf], config: &RunConfig) -> Result<()> {
    let jobs: Vec<(usize, &PathBuf)> = files.iter().enumerate().map(|(i, f)| (i + 1, f)).collect();

    let results: Vec<(usize, &PathBuf, Result<FileReport>)> = if config.parallel {
        info!(n_files = files.len(), workers = config.workers, "processing in parallel");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .context("failed to build worker pool")?;
        pool.install(|| {
            jobs.par_iter()
                .map(|&(index, path)| (index, path, run_file(path, index, config, false)))
                .collect()
        })
    } else {
        jobs.iter()
            .map(|&(index, path)| (index, path, run_file(path, index, config, true)))
            .collect()
    };

    let mut failed = 0;
    for (index, path, result) in results {
        match result {
            Ok(report) => info!(
                index = report.index,
                path = %path.display(),
                n_regions = report.n_regions,
                global_s2n = report.global_s2n,
                n_written = report.written.len(),
                "file done"
            ),
            Err(e) => {
                failed += 1;
                error!(index, path = %path.display(), "{e:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} input files failed", files.len());
    }
    Ok(())
}

/// Runs the full pipeline for input number `index` (1-based).
///
/// Every statistic is computed before the first file is written. If a
/// write fails, outputs already written for this input are removed.
pub fn run_file(
    path: &Path,
    index: usize,
    config: &RunConfig,
    progress: bool,
) -> Result<FileReport> {
    let _span = info_span!("file", index, path = %path.display()).entered();

    let map = read_map(path).with_context(|| format!("failed to read map: {}", path.display()))?;
    info!(nside = map.nside().get(), n_unseen = map.n_unseen(), "map loaded");

    let mut params = RunParams::new(
        map.nside(),
        config.band_limit,
        config.dilation,
        config.j_min,
        &config.selection,
    )?
    .with_nmaps(config.nmaps)
    .with_draw_scheme(config.draw);
    if let Some(seed) = config.seed {
        params = params.with_seed(seed.wrapping_add(index as u64));
    }

    let bridge = WaveletBridge::new(&params)?;
    let decomposition = bridge.analyze(&map, &params)?;
    info!(n_scales = params.n_scales(), simscales = ?params.simscales(), "map decomposed");

    let mut rng = match params.seed() {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let ensemble = build_ensemble(&map, &decomposition, &bridge, &params, &mut rng, progress)?;
    let stats = S2nStats::new(ensemble)?;

    let (mean, error) = stats.summary_maps();
    let mean = SphericalMap::new(map.nside(), mean.to_vec())?;
    let error = SphericalMap::new(map.nside(), error.to_vec())?;
    let global = stats.global_s2n();

    let store = MaskStore::open(&config.mask_dir)?;
    let mut local = Vec::new();
    for region in store.select(config.regions) {
        let mask = store
            .load(&region)
            .with_context(|| format!("failed to read mask for region {}", region.name()))?;
        map.ensure_same_nside(&mask)
            .with_context(|| format!("mask for region {} has the wrong resolution", region.name()))?;
        match stats.local_s2n(mask.as_slice()) {
            Ok(values) => {
                debug!(region = region.name(), real = values[values.len() - 1], "local S2N");
                local.push((region.name().to_string(), values));
            }
            Err(StatsError::EmptyRegion) => {
                warn!(region = region.name(), "mask excludes every pixel, skipping region");
            }
            Err(e) => return Err(e.into()),
        }
    }
    info!(n_regions = local.len(), "statistics computed");

    let mut written = Vec::new();
    if let Err(e) = write_outputs(index, config, &mean, &error, &global, &local, &mut written) {
        remove_partial(&written);
        return Err(e);
    }

    Ok(FileReport {
        index,
        n_regions: local.len(),
        global_s2n: global[global.len() - 1],
        written,
    })
}

fn write_outputs(
    index: usize,
    config: &RunConfig,
    mean: &SphericalMap,
    error: &SphericalMap,
    global: &[f64],
    local: &[(String, Vec<f64>)],
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let outputs = &config.outputs;
    if config.save_summary_maps {
        let writer = WriterConfig::default();
        for (path, map) in [(outputs.mean_map(index), mean), (outputs.error_map(index), error)] {
            write_map(&path, map, &writer)
                .with_context(|| format!("failed to write map: {}", path.display()))?;
            written.push(path);
        }
    }

    let path = outputs.global(index);
    write_s2n(&path, global, config.format)
        .with_context(|| format!("failed to write S2N: {}", path.display()))?;
    written.push(path);

    for (name, values) in local {
        let path = outputs.region(name, index);
        write_s2n(&path, values, config.format)
            .with_context(|| format!("failed to write S2N: {}", path.display()))?;
        written.push(path);
    }
    Ok(())
}

fn remove_partial(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), "failed to remove partial output: {e}");
        }
    }
}

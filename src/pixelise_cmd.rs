//! Pixelise command: grid a point-sample table onto a HEALPix map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tomos2n_healpix::Nside;
use tomos2n_io::{WriterConfig, pixelise, read_samples, write_map};

use crate::cli::PixeliseArgs;

/// Run the pixelisation.
pub fn run(args: PixeliseArgs) -> Result<()> {
    let _cmd = info_span!("pixelise").entered();
    let nside = Nside::new(args.nside).context("invalid --nside")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let samples = read_samples(&args.input)
        .with_context(|| format!("failed to read samples: {}", args.input.display()))?;
    info!(n = samples.len(), path = %args.input.display(), "read samples");

    let map = pixelise(&samples, nside);
    write_map(&output, &map, &WriterConfig::default())
        .with_context(|| format!("failed to write map: {}", output.display()))?;
    info!(
        path = %output.display(),
        npix = map.npix(),
        n_unseen = map.n_unseen(),
        "wrote map"
    );
    Ok(())
}

/// `<input stem>.parquet` in the working directory.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    PathBuf::from(format!("{stem}.parquet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_uses_stem() {
        assert_eq!(
            default_output(Path::new("data/tomo_layer3.txt")),
            PathBuf::from("tomo_layer3.parquet")
        );
        assert_eq!(default_output(Path::new("")), PathBuf::from("map.parquet"));
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tomos2n signal-to-noise estimator for spherical maps.
#[derive(Parser)]
#[command(
    name = "tomos2n",
    version,
    about = "Wavelet-space Monte-Carlo signal-to-noise estimation for spherical maps"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Estimate global and regional S2N for one or more maps.
    Run(RunArgs),
    /// Grid a `lon lat value` text table onto a HEALPix map.
    Pixelise(PixeliseArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file [default: tomos2n.toml, if present].
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write S2N sequences as text instead of binary.
    #[arg(long)]
    pub text: bool,

    /// Process input files in parallel.
    #[arg(short = 'P', long)]
    pub parallel: bool,

    /// Override the number of parallel workers from config.
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Input map files; replaces `inputs` from config when given.
    pub files: Vec<PathBuf>,
}

/// Arguments for the `pixelise` subcommand.
#[derive(clap::Args)]
pub struct PixeliseArgs {
    /// Whitespace-separated `lon lat value` table.
    pub input: PathBuf,

    /// HEALPix resolution of the output map.
    #[arg(long)]
    pub nside: u32,

    /// Output map path [default: <input stem>.parquet].
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

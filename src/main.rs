mod cli;
mod config;
mod convert;
mod logging;
mod pixelise_cmd;
mod run;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::run(args),
        Command::Pixelise(args) => pixelise_cmd::run(args),
    }
}

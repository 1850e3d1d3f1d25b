//! Versified CLI - bond return estimates from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Three-tier yields for one or more bonds
//! versified estimate --bond bonds.json --custody-fee 0.002 --withholding-rate 0.35
//!
//! # Per-tier cash flows
//! versified schedule --bond bond.json --tier after-tax
//!
//! # Solved yield and spread over a government curve
//! versified spread --bond bond.json --curve curve.json
//!
//! # Effective settings
//! versified config show
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "versified=info,versified_returns=info,versified_config=info",
        (false, 2) => "versified=debug,versified_returns=debug,versified_config=debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Estimate(args) => commands::estimate::execute(args, format)?,
        Commands::Schedule(args) => commands::schedule::execute(args, format)?,
        Commands::Spread(args) => commands::spread::execute(args, format)?,
        Commands::Config(args) => commands::config::execute(args, format)?,
    }

    Ok(())
}

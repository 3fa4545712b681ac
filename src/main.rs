//! tagsmith
//!
//! # What this program is
//! A small command-line toolkit for an MP3 folder workflow:
//! download audio with `yt-dlp`, set titles from file names, find and embed
//! cover art, strip cover art, and move finished files into a library folder.
//!
//! # Mental model
//! Every subcommand is the same loop:
//!
//! - find the files (one folder, optionally recursive)
//! - for each file: read tags -> decide -> at most one write
//! - print one line per file, then a summary
//!
//! A bad file never stops the run; it shows up as SKIP/MISS/ERR in the report.
//! Only "can't even start" problems (missing folder, unreadable cover image,
//! broken config, no yt-dlp) end the program early, with exit code 1.
//!
//! # Layout
//! - `cli/` parses arguments and merges them over the config file.
//! - `core/` does the work and never touches `clap` or `anyhow`.
//!
//! # Exit codes
//! - 0: done (or partially done, with `exit_policy = "lenient"`)
//! - 1: fatal startup error
//! - 2: partially done, with `exit_policy = "strict"`

mod cli;
mod core;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::cli::run::{execute, EXIT_FATAL};
use crate::core::config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let cfg = Config::load(cli.config.as_deref()).context("loading config")?;
    execute(&cli.command, &cfg)
}

/// `RUST_LOG` if set, otherwise `tagsmith=info` raised by `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("tagsmith={default_level}"))),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

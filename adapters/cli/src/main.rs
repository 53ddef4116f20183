#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter hosting the Palxel display in a text console.

mod commands;
mod config;
mod console;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::console::Console;

/// Drive a 64×36 pixel display built from 72 world objects.
#[derive(Debug, Parser)]
#[command(name = "palxel", version)]
struct Cli {
    /// TOML configuration file. Defaults to `palxel.toml` when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the random animation. Overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// Run console commands from a file instead of standard input.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

/// Entry point for the Palxel command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    info!("animation seed {seed}");

    let stdout = io::stdout();
    let mut console = Console::new(
        config.palxel,
        ChaCha8Rng::seed_from_u64(seed),
        stdout.lock(),
    );

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            console
                .run_script(BufReader::new(file))
                .with_context(|| format!("script {} failed", path.display()))
        }
        None => console.run_interactive(io::stdin().lock()),
    }
}

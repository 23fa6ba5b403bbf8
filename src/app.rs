// Declare modules
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod models;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use self::cli::Cli;
use self::config::load_config;
use self::formatter::OutputGenerator;

/// Parses arguments, compiles the config and prints it.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Working Directory
    let cwd = match args.cwd {
        Some(dir) => dir,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    // 3. Load and Compile
    let config = load_config(&args.config, &cwd)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    for path in config.bootstrap_paths() {
        if !path.exists() {
            log::warn!("⚠️ Bootstrap file not found: {}", path.display());
        }
    }

    // 4. Print to Stdout
    let output = if args.json {
        OutputGenerator::format_json(&config)?
    } else {
        OutputGenerator::format_summary(&config)
    };
    println!("{}", output);

    Ok(())
}

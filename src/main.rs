//! webres - A web resource bundler for dependency-ordered JS and CSS groups.

mod bundle;
mod cli;
mod config;
mod core;
mod error;
mod logger;
mod pipeline;
mod resource;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AppConfig::load(&cli)?;
    debug!("config"; "root {}", config.bundle.root.display());

    match &cli.command {
        Commands::Build { .. } => cli::build::build(&config).map(|_| ()),
        Commands::List { json, .. } => cli::list::list(&config, *json),
        Commands::Serve { .. } => cli::serve::serve(&config),
    }
}

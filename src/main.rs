//! livepad - a live HTML/CSS/JS playground with a sandboxed preview.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod playground;
mod reload;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PlaygroundConfig, init_config};

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

    // Init writes the config, so it must not require one
    if let Commands::Init { dir, force } = &cli.command {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let root = dir.as_ref().map_or_else(|| cwd.clone(), |d| cwd.join(d));
        cli::init::init_dir(&root, &cli.config, *force)?;
        log!("init"; "run `livepad serve` in {} to start editing", root.display());
        return Ok(());
    }

    let config = init_config(PlaygroundConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => serve(&config),
        Commands::Assemble { args } => {
            cli::assemble::assemble_document(&config, args.output.as_deref())
        }
        Commands::Init { .. } => Ok(()),
    }
}

/// Bind first so early requests get the loading page, then start the
/// actors and block in the request loop until Ctrl+C.
fn serve(config: &PlaygroundConfig) -> Result<()> {
    match (&config.source.dir, config.source.watching()) {
        (Some(dir), true) => debug!("source"; "{} (watching)", dir.display()),
        (Some(dir), false) => debug!("source"; "{}", dir.display()),
        (None, _) => debug!("source"; "built-in starter"),
    }

    let bound_server = cli::serve::bind_server()?;
    bound_server.run()
}

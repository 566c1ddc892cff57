use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;

use cli::{Cli, Commands};
use forge_tables::commands;
use forge_tables::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.settings.log_file)
        .with_context(|| format!("Failed to open log file: {}", config.settings.log_file))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting forge-tables");

    match cli.command {
        Commands::Tables => commands::tables_command(),
        Commands::Lookup { name } => commands::lookup_command(&name),
        Commands::Render { snapshot, debug } => commands::render_command(&snapshot, debug),
        Commands::Sync { snapshot } => commands::sync_command(&config, &snapshot).await,
    }
}

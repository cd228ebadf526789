//! Command implementations

mod config;
mod doctor;
mod farm;
mod image;
mod tool;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Image(args) => image::execute(args, &config, &output).await,
        Commands::Tool(args) => tool::execute(args, &config, &output).await,
        Commands::Tools => tool::list(&output),
        Commands::Farm(args) => farm::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
        Commands::Doctor(args) => doctor::execute(args, &cli.config, &config, &output).await,
    }
}

//! KissanSat CLI - Command-line interface
//!
//! Renders vegetation index maps, manages farm records, and exposes the
//! agent tools for manual invocation.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod provider;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    if let Err(error) = runtime.block_on(commands::execute(cli)) {
        let error = errors::from_anyhow(error);
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&error.to_json()).unwrap_or_else(|_| error.to_string())
            );
        } else {
            error.display();
        }
        std::process::exit(1);
    }

    Ok(())
}

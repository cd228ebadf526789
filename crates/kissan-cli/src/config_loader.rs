//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use kissan_core::config::{CliConfigOverrides, LayeredConfig};

/// Layered configuration: defaults, then `kissan.toml`, environment, and flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults()
        .load_from_optional_file(&cli.config)
        .context("Failed to load configuration file")?
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        dataset: cli.dataset.clone(),
        credentials_path: cli.credentials.clone(),
        project: cli.project.clone(),
        timeout_secs: cli.timeout_secs,
        database_url: cli.database_url.clone(),
    });
    Ok(config)
}

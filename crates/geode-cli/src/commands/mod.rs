//! Command implementations

mod analyze;
mod config;
mod sample;

use crate::cli::{Cli, Commands, RunOverrides};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use geode_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, config_path, &output).await,
        Commands::Sample(args) => sample::execute(args, &output),
        Commands::Config(args) => config::execute(args, config_path, &output),
    }
}

/// Resolve configuration: defaults, then file, then environment, then flags
pub(crate) fn resolve_config(
    config_path: Option<&Path>,
    overrides: &RunOverrides,
) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        catalog_url: overrides.catalog.clone(),
        collection: overrides.collection.clone(),
        query_timeout_secs: overrides.timeout_secs,
        concurrency: overrides.concurrency,
        seed: overrides.seed,
    });

    Ok(config)
}

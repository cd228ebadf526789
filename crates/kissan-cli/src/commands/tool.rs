use crate::cli::{ProviderKind, ToolArgs};
use crate::output::OutputWriter;
use crate::output_types::ToolRow;
use crate::provider::{build_indexer, open_store, synthetic_provider, with_deadline};
use anyhow::{Context, Result};
use kissan_core::config::LayeredConfig;
use kissan_imagery::SentinelIndexer;
use kissan_tools::{default_registry, uses_imagery, ToolRegistry};
use std::sync::Arc;

async fn registry(args: &ToolArgs, config: &LayeredConfig) -> Result<ToolRegistry> {
    // Farm tools never reach the provider, so they run without imagery credentials
    let provider = if uses_imagery(&args.name) { args.provider } else { ProviderKind::Stub };
    let indexer = build_indexer(provider, config)?;
    Ok(default_registry(indexer, open_store(config).await?))
}

pub async fn execute(args: ToolArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let tool_args: serde_json::Value = serde_json::from_str(&args.args)
        .with_context(|| format!("--args is not valid JSON: {}", args.args))?;
    if !tool_args.is_object() {
        anyhow::bail!("--args must be a JSON object");
    }

    let registry = registry(&args, config).await?;
    let result = with_deadline(config, async {
        Ok(registry.execute(&args.name, tool_args).await?)
    })
    .await?;

    output.tool_output(result)
}

/// List tool definitions; no credentials or database needed
pub fn list(output: &OutputWriter) -> Result<()> {
    let indexer = SentinelIndexer::new(Arc::new(synthetic_provider()));
    let registry = default_registry(indexer, Arc::new(kissan_store::MemoryPlotStore::new()));
    let definitions = registry.definitions();

    if output.is_json() {
        return output.result(definitions);
    }
    output.table(definitions.iter().map(ToolRow::from).collect())
}

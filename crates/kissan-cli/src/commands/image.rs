use crate::cli::ImageArgs;
use crate::output::OutputWriter;
use crate::output_types::ImageOutput;
use crate::provider::{build_indexer, open_store, with_deadline};
use anyhow::{Context, Result};
use kissan_core::config::LayeredConfig;
use kissan_core::models::{ImageSelection, IndexRequest};
use kissan_geo::{from_wkt, utm_zone_epsg};
use std::fs;

pub async fn execute(args: ImageArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let request = IndexRequest::from_args(&args.index, &args.start, &args.end)?
        .with_collection(config.dataset.value.clone())
        .with_selection(ImageSelection::from(args.image_index));

    let wkt = match (&args.wkt, &args.plot, &args.email) {
        (Some(wkt), _, _) => wkt.clone(),
        (None, Some(plot), Some(email)) => {
            let store = open_store(config).await?;
            store.get_plot_wkt(plot, email).await?
        }
        _ => anyhow::bail!("Provide --wkt, or --plot together with --email"),
    };
    let geometry = from_wkt(&wkt)?;

    let indexer = build_indexer(args.provider, config)?;
    let map = with_deadline(config, async {
        Ok(indexer.map_index(&geometry, &request).await?)
    })
    .await?;

    let exported_to = match &args.export {
        Some(path) => {
            let body = serde_json::to_string_pretty(&map.to_json())?;
            fs::write(path, body)
                .with_context(|| format!("Failed to write map to {}", path.display()))?;
            Some(path.display().to_string())
        }
        None => None,
    };

    if output.is_json() {
        return output.result(ImageOutput {
            provider: indexer.provider_name().to_string(),
            utm_epsg: utm_zone_epsg(&geometry),
            exported_to,
            summary: map.summary_json(),
        });
    }

    output.map(&map, utm_zone_epsg(&geometry));
    if let Some(path) = exported_to {
        output.success(format!("Map written to {}", path));
    }
    Ok(())
}

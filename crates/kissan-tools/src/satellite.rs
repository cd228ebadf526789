//! Vegetation index map tools

use async_trait::async_trait;
use kissan_core::models::{Geometry, ImageSelection, IndexRequest};
use kissan_geo::{from_wkt, utm_zone_epsg};
use kissan_imagery::SentinelIndexer;
use kissan_store::PlotStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::registry::{opt_i64_arg, str_arg, string_args_schema, AgentTool, ToolDefinition, ToolError};

/// Message returned when a plot cannot be resolved for a user
pub const PLOT_LOOKUP_FAILED: &str = "Check the requested plot and user";

fn image_index_schema() -> Value {
    json!({
        "type": "integer",
        "description": "Position among the images ranked most to least cloudy; negative counts from the end. Defaults to -1, the least cloudy image."
    })
}

fn selection_from(args: &Value) -> Result<ImageSelection, ToolError> {
    Ok(opt_i64_arg(args, "image_index")?.map(ImageSelection::from).unwrap_or_default())
}

async fn render_map(
    indexer: &SentinelIndexer,
    geometry: &Geometry,
    args: &Value,
) -> Result<Value, ToolError> {
    let request = IndexRequest::from_args(
        str_arg(args, "vi")?,
        str_arg(args, "start_date")?,
        str_arg(args, "end_date")?,
    )?
    .with_selection(selection_from(args)?);

    let map = indexer.map_index(geometry, &request).await?;
    let mut output = map.summary_json();
    output["utm_epsg"] = json!(utm_zone_epsg(geometry));
    output["map"] = Value::from(map.render_ascii());
    Ok(output)
}

/// Vegetation index map for a plot given directly as WKT
pub struct S2ImageTool {
    indexer: SentinelIndexer,
}

impl S2ImageTool {
    pub fn new(indexer: SentinelIndexer) -> Self {
        Self { indexer }
    }
}

#[async_trait]
impl AgentTool for S2ImageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "s2_image",
            "Return a vegetation index map (NDVI or NDWI) from Sentinel-2 imagery for a plot the \
             user describes as a WKT Polygon or MultiPolygon, over a date range. Don't use this \
             for plots in the database.",
            string_args_schema(
                &[
                    ("polygon", "Plot boundary as WKT Polygon or MultiPolygon (lon lat)"),
                    ("vi", "Vegetation index: NDVI or NDWI"),
                    ("start_date", "First day of the range, YYYY-MM-DD"),
                    ("end_date", "Last day of the range, YYYY-MM-DD"),
                ],
                &[("image_index", image_index_schema())],
            ),
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let geometry = from_wkt(str_arg(&args, "polygon")?)?;
        render_map(&self.indexer, &geometry, &args).await
    }
}

/// Vegetation index map for a plot stored in the farm database
pub struct DatabaseS2ImageTool {
    indexer: SentinelIndexer,
    store: Arc<dyn PlotStore>,
}

impl DatabaseS2ImageTool {
    pub fn new(indexer: SentinelIndexer, store: Arc<dyn PlotStore>) -> Self {
        Self { indexer, store }
    }
}

#[async_trait]
impl AgentTool for DatabaseS2ImageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "database_s2_image",
            "Look up a plot in the farm database by name and owner email and return a vegetation \
             index map (NDVI or NDWI) from Sentinel-2 imagery over a date range.",
            string_args_schema(
                &[
                    ("plot_name", "Name of the plot in the database"),
                    ("user_email", "Email of the plot owner"),
                    ("vi", "Vegetation index: NDVI or NDWI"),
                    ("start_date", "First day of the range, YYYY-MM-DD"),
                    ("end_date", "Last day of the range, YYYY-MM-DD"),
                ],
                &[("image_index", image_index_schema())],
            ),
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let plot_name = str_arg(&args, "plot_name")?;
        let email = str_arg(&args, "user_email")?;

        let wkt = self.store.get_plot_wkt(plot_name, email).await.map_err(|e| {
            warn!(plot = plot_name, email, error = %e, "Plot lookup failed");
            ToolError::ExecutionFailed(PLOT_LOOKUP_FAILED.to_string())
        })?;
        let geometry = from_wkt(&wkt)?;
        render_map(&self.indexer, &geometry, &args).await
    }
}

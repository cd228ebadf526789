//! Farm database tools
//!
//! Each tool wraps one `PlotStore` operation and echoes the stored record.

use async_trait::async_trait;
use kissan_core::models::farm::parse_season;
use kissan_store::PlotStore;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::registry::{str_arg, AgentTool, ToolDefinition, ToolError};

const DATE_HINT: &str = "YYYY-MM-DD";

fn record<T: Serialize>(record: &T) -> Result<Value, ToolError> {
    serde_json::to_value(record).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

macro_rules! store_tool {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            store: Arc<dyn PlotStore>,
        }

        impl $name {
            pub fn new(store: Arc<dyn PlotStore>) -> Self {
                Self { store }
            }
        }
    };
}

store_tool!(
    /// Register a farmer
    AddUserTool
);
store_tool!(
    /// Register a plot owned by an existing farmer
    AddPlotTool
);
store_tool!(
    /// Register a vegetation bed (a small area where single plants are tracked)
    AddVegBedTool
);
store_tool!(
    /// Record a growing season of one variety on a plot
    AddPlotSeasonTool
);
store_tool!(
    /// Record a season for individually positioned plants in a vegetation bed
    AddPlantSeasonTool
);
store_tool!(
    /// Register a species
    AddSpeciesTool
);
store_tool!(
    /// Register a variety of an existing species
    AddVarietyTool
);
store_tool!(
    /// Fetch the stored boundary of a plot as WKT
    PolygonWktTool
);

#[async_trait]
impl AgentTool for AddUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_user",
            "Add a user to the farmers' database. Ask the user for their full name and email. \
             Afterwards they can add plots and vegetation beds.",
            &[("full_name", "Full name of the farmer"), ("email", "Email address of the farmer")],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let user = self.store.add_user(str_arg(&args, "full_name")?, str_arg(&args, "email")?).await?;
        record(&user)
    }
}

#[async_trait]
impl AgentTool for AddPlotTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_plot",
            "Add a plot to the database for a user identified by email. Only add the user first \
             if their email is not in the database yet.",
            &[
                ("name", "Plot name"),
                ("delimitation", "Plot boundary as WKT Polygon or MultiPolygon (lon lat)"),
                ("email", "Email of the plot owner"),
            ],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let plot = self
            .store
            .add_plot(
                str_arg(&args, "name")?,
                str_arg(&args, "delimitation")?,
                str_arg(&args, "email")?,
            )
            .await?;
        record(&plot)
    }
}

#[async_trait]
impl AgentTool for AddVegBedTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_veg_bed",
            "Add a vegetation bed to the database for a user identified by email. Only add the \
             user first if their email is not in the database yet.",
            &[
                ("name", "Vegetation bed name"),
                ("delimitation", "Bed boundary as WKT Polygon or MultiPolygon (lon lat)"),
                ("email", "Email of the bed owner"),
            ],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let bed = self
            .store
            .add_veg_bed(
                str_arg(&args, "name")?,
                str_arg(&args, "delimitation")?,
                str_arg(&args, "email")?,
            )
            .await?;
        record(&bed)
    }
}

#[async_trait]
impl AgentTool for AddPlotSeasonTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_plot_season",
            "Add a growing season of a variety to an existing plot. Ask the user whether to add \
             the plot if it cannot be found.",
            &[
                ("start_date", DATE_HINT),
                ("end_date", DATE_HINT),
                ("variety_name", "Variety grown during the season"),
                ("plot_name", "Name of the plot"),
                ("email", "Email of the plot owner"),
            ],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let (start, end) = parse_season(str_arg(&args, "start_date")?, str_arg(&args, "end_date")?)?;
        let season = self
            .store
            .add_plot_season(
                start,
                end,
                str_arg(&args, "variety_name")?,
                str_arg(&args, "plot_name")?,
                str_arg(&args, "email")?,
            )
            .await?;
        record(&season)
    }
}

#[async_trait]
impl AgentTool for AddPlantSeasonTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_plant_season",
            "Add a season for one or more plants in an existing vegetation bed. Ask the user \
             whether to add the vegetation bed if it cannot be found.",
            &[
                ("start_date", DATE_HINT),
                ("end_date", DATE_HINT),
                ("position", "Plant position(s) as WKT, e.g. POINT or MULTIPOINT (lon lat)"),
                ("variety_name", "Variety of the plants"),
                ("veg_bed_name", "Name of the vegetation bed"),
                ("email", "Email of the bed owner"),
            ],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let (start, end) = parse_season(str_arg(&args, "start_date")?, str_arg(&args, "end_date")?)?;
        let season = self
            .store
            .add_plant_season(
                start,
                end,
                str_arg(&args, "position")?,
                str_arg(&args, "variety_name")?,
                str_arg(&args, "veg_bed_name")?,
                str_arg(&args, "email")?,
            )
            .await?;
        record(&season)
    }
}

#[async_trait]
impl AgentTool for AddSpeciesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_species",
            "Add a species to the database. Check whether it exists before adding it.",
            &[("name", "Species name")],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let species = self.store.add_species(str_arg(&args, "name")?).await?;
        record(&species)
    }
}

#[async_trait]
impl AgentTool for AddVarietyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "add_variety",
            "Add a variety of an existing species to the database. Check whether it exists \
             before adding it.",
            &[("variety_name", "Variety name"), ("species_name", "Species the variety belongs to")],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let variety = self
            .store
            .add_variety(str_arg(&args, "variety_name")?, str_arg(&args, "species_name")?)
            .await?;
        record(&variety)
    }
}

#[async_trait]
impl AgentTool for PolygonWktTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::with_string_args(
            "polygon_wkt",
            "Convert a plot stored in the database to WKT (well-known text).",
            &[("name", "Plot name"), ("user_email", "Email of the plot owner")],
        )
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let name = str_arg(&args, "name")?;
        let wkt = self.store.get_plot_wkt(name, str_arg(&args, "user_email")?).await?;
        Ok(json!({ "name": name, "wkt": wkt }))
    }
}

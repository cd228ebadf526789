//! KissanSat Tools - Agent-callable tools over the imagery pipeline and farm store
//!
//! Tools take string-typed JSON arguments and return JSON. The registry
//! exposes their definitions (name, description, argument schema) so an agent
//! runtime, the CLI, or the HTTP API can list and invoke them by name.

pub mod farm;
pub mod registry;
pub mod satellite;

pub use registry::{AgentTool, ToolDefinition, ToolError, ToolRegistry};
pub use satellite::{DatabaseS2ImageTool, S2ImageTool, PLOT_LOOKUP_FAILED};

use kissan_imagery::SentinelIndexer;
use kissan_store::PlotStore;
use std::sync::Arc;

/// Tools that call the imagery provider; the rest only touch the farm store
pub const IMAGERY_TOOLS: [&str; 2] = ["s2_image", "database_s2_image"];

pub fn uses_imagery(tool_name: &str) -> bool {
    IMAGERY_TOOLS.contains(&tool_name)
}

/// Registry with every KissanSat tool wired to `indexer` and `store`
pub fn default_registry(indexer: SentinelIndexer, store: Arc<dyn PlotStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(S2ImageTool::new(indexer.clone()));
    registry.register(DatabaseS2ImageTool::new(indexer, store.clone()));
    registry.register(farm::AddUserTool::new(store.clone()));
    registry.register(farm::AddPlotTool::new(store.clone()));
    registry.register(farm::AddVegBedTool::new(store.clone()));
    registry.register(farm::AddPlotSeasonTool::new(store.clone()));
    registry.register(farm::AddPlantSeasonTool::new(store.clone()));
    registry.register(farm::AddSpeciesTool::new(store.clone()));
    registry.register(farm::AddVarietyTool::new(store.clone()));
    registry.register(farm::PolygonWktTool::new(store));
    registry
}

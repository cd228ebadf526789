use kissan_imagery::SentinelIndexer;
use kissan_store::PlotStore;
use kissan_tools::{default_registry, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub indexer: SentinelIndexer,
    pub store: Arc<dyn PlotStore>,
    pub tools: ToolRegistry,
    /// Deadline for one imagery request
    pub timeout: Duration,
}

impl AppState {
    pub fn new(indexer: SentinelIndexer, store: Arc<dyn PlotStore>, timeout: Duration) -> Self {
        let tools = default_registry(indexer.clone(), store.clone());
        Self { indexer, store, tools, timeout }
    }
}

//! KissanSat Store - Farm database ports and adapters
//!
//! This crate defines the farm store port and provides in-memory and
//! PostgreSQL/PostGIS implementations.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryPlotStore;
pub use ports::PlotStore;
pub use postgres::{MigrationStatus, PostgresConfig, PostgresStore};

use kissan_core::error::Result;
use std::sync::Arc;

/// Open the farm store: PostgreSQL (migrated) when a URL is given, in-memory otherwise
pub async fn open_store(database_url: Option<&str>) -> Result<Arc<dyn PlotStore>> {
    match database_url {
        Some(url) => {
            let config = PostgresConfig::new(url)?;
            Ok(Arc::new(PostgresStore::new(config).await?))
        }
        None => {
            tracing::info!("No database configured, using in-memory farm store");
            Ok(Arc::new(MemoryPlotStore::new()))
        }
    }
}

//! PostgreSQL/PostGIS farm store

pub mod config;
pub mod migrations;
pub mod plots;

pub use config::{ConfigError, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};

use kissan_core::error::{KissanError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect, check the connection, and migrate the schema when the config asks for it
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| KissanError::Database(format!("Failed to connect to database: {}", e)))?;

        let store = Self { pool };
        store.health_check_inner().await?;
        info!(database = %config.redacted_url(), "Connected to farm database");

        if config.run_migrations {
            store.run_migrations().await?;
        }
        Ok(store)
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone())
            .run_migrations()
            .await
            .map_err(|e| KissanError::Database(format!("Migration failed: {}", e)))?;
        info!("Farm schema is up to date");
        Ok(())
    }

    /// Applied/pending state of every bundled migration
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        MigrationManager::new(self.pool.clone()).check_status().await.map_err(|e| {
            KissanError::Database(format!("Failed to check migration status: {}", e))
        })
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check_inner(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| KissanError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

/// Map a sqlx error, turning unique violations into `DuplicateRecord`
pub(crate) fn map_write_error(entity: &str, key: &str, error: sqlx::Error) -> KissanError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            KissanError::DuplicateRecord { entity: entity.to_string(), key: key.to_string() }
        }
        _ => KissanError::Database(format!("Failed to write {}: {}", entity, error)),
    }
}

pub(crate) fn map_read_error(entity: &str, error: sqlx::Error) -> KissanError {
    KissanError::Database(format!("Failed to read {}: {}", entity, error))
}

//! Connection settings for the PostGIS farm store

use kissan_core::config::redact_url;
use kissan_core::KissanError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("database URL is empty")]
    EmptyUrl,

    #[error("'{0}' is not a PostgreSQL URL (expected postgres:// or postgresql://)")]
    UnsupportedScheme(String),

    #[error("pool allows at most {max} connections but keeps {min} open")]
    PoolBounds { min: u32, max: u32 },
}

impl From<ConfigError> for KissanError {
    fn from(error: ConfigError) -> Self {
        KissanError::ConfigInvalid { key: "database_url".to_string(), reason: error.to_string() }
    }
}

/// Where the farm database lives and how the store talks to it
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub pool: PoolConfig,
    /// Apply pending schema migrations when the store connects
    pub run_migrations: bool,
}

impl PostgresConfig {
    pub fn new(database_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            database_url: database_url.into().trim().to_string(),
            pool: PoolConfig::default(),
            run_migrations: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Connect without touching the schema, e.g. to inspect migration state
    pub fn without_migrations(mut self) -> Self {
        self.run_migrations = false;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ConfigError::UnsupportedScheme(self.redacted_url()));
        }
        self.pool.validate()
    }

    /// The URL with its password masked, for logs and diagnostics
    pub fn redacted_url(&self) -> String {
        redact_url(&self.database_url)
    }
}

/// Pool sizing; a CLI run or one API process issues few concurrent queries
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ConfigError::PoolBounds {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }
}

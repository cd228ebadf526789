use kissan_core::config::LayeredConfig;
use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Imagery and database settings shared with the CLI
    pub imagery: LayeredConfig,
}

impl ApiConfig {
    /// Load configuration from environment variables
    ///
    /// Imagery settings also read `KISSAN_CONFIG` (default `kissan.toml`) when present.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("KISSAN_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin =
            env::var("KISSAN_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config_path =
            env::var("KISSAN_CONFIG").map(PathBuf::from).unwrap_or_else(|_| "kissan.toml".into());
        let imagery = LayeredConfig::with_defaults().load_from_optional_file(config_path)?.load_from_env();

        Ok(Self { port, cors_origin, imagery })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.imagery.database_url.value.is_some()
    }
}

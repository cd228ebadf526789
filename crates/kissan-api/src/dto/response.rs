use serde::Serialize;
use serde_json::Value;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub imagery_provider: String,
    pub store_backend: String,
}

/// Vegetation index map response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub utm_epsg: Option<u32>,
    #[serde(flatten)]
    pub map: Value,
}

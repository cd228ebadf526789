//! Google Earth Engine imagery provider (REST API)

pub mod auth;
pub mod expression;

use async_trait::async_trait;
use chrono::Utc;
use kissan_core::config::LayeredConfig;
use kissan_core::error::{KissanError, Result};
use kissan_core::models::{BandPair, DateRange, ImageCandidate, ProviderGeometry};
use kissan_core::ports::ImageryProvider;
use ndarray::Array2;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::bands::materialize_sample;
pub use auth::{AccessToken, ServiceAccountKey};

/// Earth Engine client authenticated with a service-account key
///
/// Construct once and share it (`Arc<dyn ImageryProvider>`); the bearer
/// token is cached and refreshed shortly before it expires.
pub struct EarthEngineClient {
    /// Base URL of the REST API (e.g., "https://earthengine.googleapis.com/v1")
    base_url: String,

    /// Cloud project the compute calls are billed to
    project: String,

    key: ServiceAccountKey,

    client: reqwest::Client,

    token: RwLock<Option<AccessToken>>,
}

impl EarthEngineClient {
    /// Create a client; `project` falls back to the key's own project
    pub fn new(
        key: ServiceAccountKey,
        project: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let project = project.or_else(|| key.project_id.clone()).ok_or_else(|| {
            KissanError::ConfigMissing {
                key: "project (KISSAN_GEE_PROJECT or project_id in the key file)".to_string(),
            }
        })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project,
            key,
            client: reqwest::Client::new(),
            token: RwLock::new(None),
        })
    }

    /// Create a client from a key file on disk
    pub fn from_credentials_file(
        path: &Path,
        project: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::new(ServiceAccountKey::from_file(path)?, project, base_url)
    }

    /// Create a client from the layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::from_credentials_file(
            &config.credentials_path.value,
            config.project.value.clone(),
            config.ee_api_url.value.clone(),
        )
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn service_account(&self) -> &str {
        &self.key.client_email
    }

    /// A valid bearer token, fetching a new one when the cached one is stale
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = auth::sign_assertion(&self.key, now)?;

        debug!(service_account = %self.key.client_email, "Requesting Earth Engine access token");
        let response = self
            .client
            .post(&self.key.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(auth::token_request_body(&assertion))
            .send()
            .await
            .map_err(|e| KissanError::remote(format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KissanError::remote(format!(
                "Token exchange rejected ({}): {}",
                status, error_text
            )));
        }

        let token: auth::TokenResponse = response
            .json()
            .await
            .map_err(|e| KissanError::remote(format!("Failed to parse token response: {}", e)))?;

        info!(expires_in = token.expires_in, "Obtained Earth Engine access token");
        Ok(AccessToken::from_response(token, now))
    }

    /// Evaluate an expression graph with `value:compute`
    pub async fn compute(&self, body: &Value) -> Result<Value> {
        let token = self.access_token().await?;
        let url = format!("{}/projects/{}/value:compute", self.base_url, self.project);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| KissanError::remote(format!("Failed to connect to Earth Engine: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KissanError::remote(format!(
                "Earth Engine API error ({}): {}",
                status,
                error_message(&error_text)
            )));
        }

        let computed: ComputeResponse = response
            .json()
            .await
            .map_err(|e| KissanError::remote(format!("Failed to parse compute response: {}", e)))?;
        Ok(computed.result)
    }
}

/// Response body of `value:compute`
#[derive(Debug, Deserialize)]
struct ComputeResponse {
    result: Value,
}

/// The `error.message` of a Google API error body, or the body itself
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ImageryProvider for EarthEngineClient {
    fn name(&self) -> &str {
        "earth-engine"
    }

    async fn list_images(
        &self,
        collection: &str,
        date_range: &DateRange,
        region: &ProviderGeometry,
    ) -> Result<Vec<ImageCandidate>> {
        let body = expression::image_list(collection, date_range, region);
        let result = self.compute(&body).await?;
        let candidates = expression::parse_image_list(&result)?;
        debug!(collection, %date_range, count = candidates.len(), "Listed images");
        Ok(candidates)
    }

    async fn sample_normalized_difference(
        &self,
        image: &ImageCandidate,
        bands: BandPair,
        region: &ProviderGeometry,
    ) -> Result<Array2<f64>> {
        let body = expression::normalized_difference_sample(&image.id, bands, region);
        let sample = self.compute(&body).await?;
        materialize_sample(&sample, expression::NORMALIZED_DIFFERENCE_BAND)
    }
}

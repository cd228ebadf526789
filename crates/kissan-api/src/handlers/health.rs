use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "kissan-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        imagery_provider: state.indexer.provider_name().to_string(),
        store_backend: state.store.backend().to_string(),
    })
}

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Tools
        .route("/api/v1/tools", get(handlers::list_tools))
        .route("/api/v1/tools/{name}", post(handlers::invoke_tool))
        // Vegetation index maps
        .route("/api/v1/index", post(handlers::compute_index))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use kissan_tools::ToolDefinition;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolDefinition>> {
    Json(state.tools.definitions())
}

pub async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !args.is_object() {
        return Err(ApiError::bad_request("Tool arguments must be a JSON object"));
    }
    tracing::info!(tool = %name, "Invoking tool");

    let result = tokio::time::timeout(state.timeout, state.tools.execute(&name, args))
        .await
        .map_err(|_| ApiError::timeout(state.timeout.as_secs()))??;
    Ok(Json(result))
}

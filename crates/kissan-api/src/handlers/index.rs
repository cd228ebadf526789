use std::sync::Arc;

use axum::{extract::State, Json};
use kissan_core::models::{ImageSelection, IndexRequest};
use kissan_geo::{from_wkt, utm_zone_epsg};

use crate::dto::{IndexRequestBody, IndexResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn compute_index(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IndexRequestBody>,
) -> Result<Json<IndexResponse>, ApiError> {
    tracing::info!(
        index = %body.index,
        start = %body.start,
        end = %body.end,
        image_index = body.image_index,
        "Processing vegetation index request"
    );

    let selection = body.image_index.map(ImageSelection::from).unwrap_or_default();
    let request = IndexRequest::from_args(&body.index, &body.start, &body.end)?.with_selection(selection);
    let geometry = from_wkt(&body.wkt)?;

    let map = tokio::time::timeout(state.timeout, state.indexer.map_index(&geometry, &request))
        .await
        .map_err(|_| ApiError::timeout(state.timeout.as_secs()))??;

    let map_json = if body.include_grid { map.to_json() } else { map.summary_json() };
    Ok(Json(IndexResponse { utm_epsg: utm_zone_epsg(&geometry), map: map_json }))
}

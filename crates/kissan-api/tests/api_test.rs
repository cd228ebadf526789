//! Router tests against the in-process imagery provider and memory store

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use kissan_api::{create_router, AppState};
use kissan_core::models::ImageCandidate;
use kissan_imagery::{SentinelIndexer, StaticImageryProvider};
use kissan_store::MemoryPlotStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const PLOT: &str = "POLYGON((76.5 10.0,76.5 10.01,76.51 10.01,76.51 10.0,76.5 10.0))";

fn app() -> Router {
    let acquired = Utc.with_ymd_and_hms(2023, 5, 14, 5, 36, 29).unwrap();
    let provider = StaticImageryProvider::new()
        .with_uniform_image(
            ImageCandidate::new("S2/hazy", acquired, 40.0),
            (5, 5),
            &[("B8", 0.5), ("B4", 0.5), ("B12", 0.5)],
        )
        .with_uniform_image(
            ImageCandidate::new("S2/clear", acquired, 2.0),
            (5, 5),
            &[("B8", 0.6), ("B4", 0.2), ("B12", 0.3)],
        );
    let state = AppState::new(
        SentinelIndexer::new(Arc::new(provider)),
        Arc::new(MemoryPlotStore::new()),
        Duration::from_secs(30),
    );
    create_router(Arc::new(state))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_backends() {
    let (status, body) = send(app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["imagery_provider"], "static");
    assert_eq!(body["store_backend"], "memory");
}

#[tokio::test]
async fn lists_tools() {
    let (status, body) = send(app(), "GET", "/api/v1/tools", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn index_defaults_to_least_cloudy_image() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/index",
        Some(json!({"wkt": PLOT, "start": "2023-05-01", "end": "2023-06-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_id"], "S2/clear");
    assert_eq!(body["title"], "NDVI : 2023-05-14");
    assert_eq!(body["utm_epsg"], 32643);
    assert!(body.get("grid").is_none());
}

#[tokio::test]
async fn index_with_grid_and_first_image() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/index",
        Some(json!({
            "wkt": PLOT,
            "index": "ndwi",
            "start": "2023-05-01",
            "end": "2023-06-01",
            "image_index": 0,
            "include_grid": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image_id"], "S2/hazy");
    assert_eq!(body["grid"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn index_rejects_unsupported_kind() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/v1/index",
        Some(json!({"wkt": PLOT, "index": "EVI", "start": "2023-05-01", "end": "2023-06-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("EVI"));
}

#[tokio::test]
async fn index_empty_range_is_not_found() {
    let (status, _) = send(
        app(),
        "POST",
        "/api/v1/index",
        Some(json!({"wkt": PLOT, "start": "2024-01-01", "end": "2024-02-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tool_invocation_and_lookup_failure() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/v1/tools/add_user",
        Some(json!({"full_name": "Asha Rao", "email": "asha@example.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "asha@example.org");

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/v1/tools/database_s2_image",
        Some(json!({
            "plot_name": "missing",
            "user_email": "asha@example.org",
            "vi": "NDVI",
            "start_date": "2023-05-01",
            "end_date": "2023-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Check the requested plot and user");

    let (status, _) = send(app, "POST", "/api/v1/tools/weather", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

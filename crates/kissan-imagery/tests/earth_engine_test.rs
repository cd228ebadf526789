//! Earth Engine client against a local stand-in for the token and compute endpoints

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use kissan_core::models::{Geometry, IndexRequest, ProviderGeometry, VegetationIndexKind};
use kissan_core::ports::ImageryProvider;
use kissan_core::KissanError;
use kissan_imagery::earth_engine::ServiceAccountKey;
use kissan_imagery::{EarthEngineClient, SentinelIndexer};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const KEY_JSON: &str = include_str!("fixtures/test_service_account.json");
const TOKEN: &str = "ee-token-1";
const THROTTLED_PROJECT: &str = "throttled";

#[derive(Default)]
struct Calls {
    token: AtomicUsize,
    compute: AtomicUsize,
}

async fn token(State(calls): State<Arc<Calls>>, body: String) -> (StatusCode, Json<Value>) {
    calls.token.fetch_add(1, Ordering::SeqCst);
    if !body.contains("grant_type=") || !body.contains("assertion=") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"})));
    }
    (StatusCode::OK, Json(json!({"access_token": TOKEN, "expires_in": 3600, "token_type": "Bearer"})))
}

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"error": {"code": status.as_u16(), "message": message}})))
}

async fn compute(
    State(calls): State<Arc<Calls>>,
    Path(project): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    calls.compute.fetch_add(1, Ordering::SeqCst);

    let bearer = format!("Bearer {}", TOKEN);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(bearer.as_str()) {
        return api_error(StatusCode::UNAUTHORIZED, "Request had invalid authentication credentials.");
    }
    if project == THROTTLED_PROJECT {
        return api_error(StatusCode::TOO_MANY_REQUESTS, "Too many concurrent aggregations.");
    }

    let graph = body.to_string();
    if graph.contains("Image.sampleRectangle") {
        if !graph.contains("S2/clear") {
            return api_error(StatusCode::NOT_FOUND, "Image asset not found.");
        }
        return (
            StatusCode::OK,
            Json(json!({"result": {
                "type": "Feature",
                "geometry": null,
                "properties": {"nd": [[0.5, null, 0.25], [0.0, -0.1, 0.75]]}
            }})),
        );
    }
    if graph.contains("Collection.toList") {
        return (
            StatusCode::OK,
            Json(json!({"result": [
                {"type": "Image", "id": "S2/hazy", "properties": {"system:time_start": 1683610591000i64, "CLOUDY_PIXEL_PERCENTAGE": 40.0}},
                {"type": "Image", "id": "S2/clear", "properties": {"system:time_start": 1684042589000i64, "CLOUDY_PIXEL_PERCENTAGE": 5.0}},
            ]})),
        );
    }
    api_error(StatusCode::BAD_REQUEST, "Unexpected expression.")
}

async fn serve(calls: Arc<Calls>) -> SocketAddr {
    let app = Router::new()
        .route("/token", post(token))
        .route("/v1/projects/{project}/value:compute", post(compute))
        .with_state(calls);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, project: Option<&str>) -> EarthEngineClient {
    let mut key = ServiceAccountKey::from_json(KEY_JSON).unwrap();
    key.token_uri = format!("http://{}/token", addr);
    EarthEngineClient::new(key, project.map(str::to_string), format!("http://{}/v1", addr)).unwrap()
}

fn region() -> ProviderGeometry {
    ProviderGeometry::Polygon(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]])
}

#[tokio::test]
async fn one_token_serves_several_compute_calls() {
    let calls = Arc::new(Calls::default());
    let client = client(serve(calls.clone()).await, None);
    let range = kissan_core::models::DateRange::parse("2023-05-01", "2023-06-01").unwrap();

    let candidates =
        client.list_images("COPERNICUS/S2_SR_HARMONIZED", &range, &region()).await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1].id, "S2/clear");
    assert_eq!(candidates[1].cloud_cover, 5.0);

    let grid = client
        .sample_normalized_difference(&candidates[1], VegetationIndexKind::Ndvi.bands(), &region())
        .await
        .unwrap();
    assert_eq!(grid.dim(), (2, 3));
    assert!(grid[[0, 1]].is_nan());
    assert_eq!(grid[[1, 2]], 0.75);

    assert_eq!(calls.token.load(Ordering::SeqCst), 1);
    assert_eq!(calls.compute.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn api_error_body_becomes_remote_error() {
    let calls = Arc::new(Calls::default());
    let client = client(serve(calls.clone()).await, Some(THROTTLED_PROJECT));
    let range = kissan_core::models::DateRange::parse("2023-05-01", "2023-06-01").unwrap();

    let err = client.list_images("COPERNICUS/S2_SR_HARMONIZED", &range, &region()).await.unwrap_err();

    match err {
        KissanError::RemoteService { reason } => {
            assert!(reason.contains("429"), "{reason}");
            assert!(reason.contains("Too many concurrent aggregations."), "{reason}");
            assert!(!reason.contains("\"code\""), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_samples_least_cloudy_image() {
    let calls = Arc::new(Calls::default());
    let indexer = SentinelIndexer::new(Arc::new(client(serve(calls.clone()).await, None)));
    let request = IndexRequest::from_args("ndvi", "2023-05-01", "2023-06-01").unwrap();

    let result = indexer.fetch_index(&Geometry::square(0.0, 0.0, 1.0), &request).await.unwrap();

    assert_eq!(result.image_id, "S2/clear");
    assert_eq!(result.acquired_at, Utc.with_ymd_and_hms(2023, 5, 14, 5, 36, 29).unwrap());
    assert_eq!(result.values.dim(), (2, 3));
    assert_eq!(calls.token.load(Ordering::SeqCst), 1);
}

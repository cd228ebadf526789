use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use kissan_imagery::{EarthEngineClient, SentinelIndexer};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kissan_api::config::ApiConfig;
use kissan_api::router::create_router;
use kissan_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kissan_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    tracing::info!(
        port = config.port,
        dataset = %config.imagery.dataset.value,
        postgres = config.uses_postgres(),
        "Starting KissanSat API server"
    );

    let client = match EarthEngineClient::from_config(&config.imagery) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to set up Earth Engine: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Set KISSAN_GEE_CREDENTIALS to a service-account key file\n\
                2. Set KISSAN_GEE_PROJECT if the key has no project_id\n\
                3. Run `kissan doctor --online` to verify access"
            );
            std::process::exit(1);
        }
    };
    tracing::info!(service_account = client.service_account(), project = client.project(), "Earth Engine ready");

    // Initialize the farm store based on DATABASE_URL
    let store = match kissan_store::open_store(config.imagery.database_url.value.as_deref()).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Ensure PostgreSQL with PostGIS is running\n\
                2. Verify DATABASE_URL is correct\n\
                3. Check that the database exists and is accessible"
            );
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(
        SentinelIndexer::new(Arc::new(client)),
        store,
        Duration::from_secs(config.imagery.timeout_secs.value),
    ));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}

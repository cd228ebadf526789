//! Behavior shared by every farm store backend
//!
//! The PostgreSQL run needs a PostGIS database and is skipped unless
//! `KISSAN_TEST_DATABASE_URL` is set.

use chrono::NaiveDate;
use kissan_core::KissanError;
use kissan_store::{MemoryPlotStore, PlotStore, PostgresConfig, PostgresStore};

const FIELD: &str = "POLYGON((75.80 30.90,75.80 30.91,75.81 30.91,75.81 30.90,75.80 30.90))";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A fresh email per run so repeated runs against one database don't collide
fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.org", tag, nanos)
}

async fn exercise_store(store: &dyn PlotStore) {
    let email = unique_email("farmer");
    let crop = format!("wheat-{}", email);
    let variety = format!("pbw 343-{}", email);

    store.add_user("Harpreet Kaur", &email.to_uppercase()).await.unwrap();
    store.add_plot("Canal Side", FIELD, &email).await.unwrap();
    store.add_species(&crop).await.unwrap();
    store.add_variety(&variety, &crop).await.unwrap();
    store
        .add_plot_season(date(2023, 11, 1), date(2024, 4, 15), &variety, "canal side", &email)
        .await
        .unwrap();

    let wkt = store.get_plot_wkt("CANAL SIDE", &email).await.unwrap();
    assert_eq!(
        kissan_geo::from_wkt(&wkt).unwrap(),
        kissan_geo::from_wkt(FIELD).unwrap()
    );

    let plots = store.list_plots(&email).await.unwrap();
    assert_eq!(plots.len(), 1);
    assert_eq!(plots[0].name, "canal side");

    let err = store.get_plot_wkt("orchard", &email).await.unwrap_err();
    assert!(matches!(err, KissanError::UpstreamLookup { .. }));

    let err = store.add_plot("canal side", FIELD, &email).await.unwrap_err();
    assert!(matches!(err, KissanError::DuplicateRecord { .. }));

    let err = store
        .add_plot_season(date(2024, 1, 1), date(2024, 2, 1), "unknown variety", "canal side", &email)
        .await
        .unwrap_err();
    assert!(matches!(err, KissanError::RecordNotFound { ref entity, .. } if entity == "variety"));

    store.health_check().await.unwrap();
}

#[tokio::test]
async fn memory_store_behavior() {
    let store = MemoryPlotStore::new();
    exercise_store(&store).await;
}

#[tokio::test]
async fn postgres_store_behavior() {
    let Ok(url) = std::env::var("KISSAN_TEST_DATABASE_URL") else {
        eprintln!("KISSAN_TEST_DATABASE_URL not set, skipping");
        return;
    };
    let config = PostgresConfig::new(url).unwrap();
    let store = PostgresStore::new(config).await.unwrap();

    let status = store.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|m| m.applied), "{status:?}");

    exercise_store(&store).await;
}

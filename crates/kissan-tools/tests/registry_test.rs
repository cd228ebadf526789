//! Full tool registry against the in-memory store and in-process imagery

use chrono::{TimeZone, Utc};
use kissan_core::models::ImageCandidate;
use kissan_imagery::{SentinelIndexer, StaticImageryProvider};
use kissan_store::MemoryPlotStore;
use kissan_tools::{default_registry, uses_imagery, ToolError, ToolRegistry, IMAGERY_TOOLS};
use serde_json::json;
use std::sync::Arc;

fn registry() -> ToolRegistry {
    let acquired = Utc.with_ymd_and_hms(2023, 3, 20, 5, 36, 29).unwrap();
    let provider = StaticImageryProvider::new().with_uniform_image(
        ImageCandidate::new("S2/clear", acquired, 3.0),
        (6, 6),
        &[("B8", 0.45), ("B4", 0.15), ("B12", 0.25)],
    );
    default_registry(SentinelIndexer::new(Arc::new(provider)), Arc::new(MemoryPlotStore::new()))
}

#[test]
fn lists_every_tool_sorted() {
    let names: Vec<String> = registry().definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![
            "add_plant_season",
            "add_plot",
            "add_plot_season",
            "add_species",
            "add_user",
            "add_variety",
            "add_veg_bed",
            "database_s2_image",
            "polygon_wkt",
            "s2_image",
        ]
    );
}

#[test]
fn only_image_tools_use_imagery() {
    let registry = registry();
    for name in IMAGERY_TOOLS {
        assert!(registry.contains(name));
    }
    let farm_tools: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|d| d.name)
        .filter(|name| !uses_imagery(name))
        .collect();
    assert_eq!(farm_tools.len(), 8);
    assert!(farm_tools.iter().all(|name| !name.contains("s2_image")));
}

#[test]
fn every_definition_has_an_object_schema() {
    for definition in registry().definitions() {
        assert_eq!(definition.parameters["type"], "object", "{}", definition.name);
        assert!(!definition.parameters["required"].as_array().unwrap().is_empty());
        assert!(!definition.description.is_empty());
    }
}

#[tokio::test]
async fn farm_onboarding_then_plot_map() {
    let registry = registry();

    registry
        .execute("add_user", json!({"full_name": "Ravi Kumar", "email": "ravi@example.org"}))
        .await
        .unwrap();
    registry
        .execute(
            "add_plot",
            json!({
                "name": "River Plot",
                "delimitation": "POLYGON((76.5 10.0,76.5 10.01,76.51 10.01,76.51 10.0,76.5 10.0))",
                "email": "ravi@example.org"
            }),
        )
        .await
        .unwrap();
    registry.execute("add_species", json!({"name": "Oryza sativa"})).await.unwrap();
    registry
        .execute("add_variety", json!({"variety_name": "IR64", "species_name": "oryza sativa"}))
        .await
        .unwrap();
    let season = registry
        .execute(
            "add_plot_season",
            json!({
                "start_date": "2023-02-01",
                "end_date": "2023-06-30",
                "variety_name": "ir64",
                "plot_name": "River Plot",
                "email": "ravi@example.org"
            }),
        )
        .await
        .unwrap();
    assert_eq!(season["start_date"], "2023-02-01");

    let map = registry
        .execute(
            "database_s2_image",
            json!({
                "plot_name": "river plot",
                "user_email": "ravi@example.org",
                "vi": "NDWI",
                "start_date": "2023-03-01",
                "end_date": "2023-03-31"
            }),
        )
        .await
        .unwrap();

    assert_eq!(map["title"], "NDWI : 2023-03-20");
    assert_eq!(map["utm_epsg"], 32643);
    let mean = map["stats"]["mean"].as_f64().unwrap();
    assert!((mean - 0.2857142857142857).abs() < 1e-9);
}

#[tokio::test]
async fn unsupported_index_never_reaches_provider() {
    let result = registry()
        .execute(
            "s2_image",
            json!({
                "polygon": "POLYGON((0 0,0 1,1 1,1 0,0 0))",
                "vi": "EVI",
                "start_date": "2023-03-01",
                "end_date": "2023-03-31"
            }),
        )
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ToolError::Domain(_)));
    assert!(err.to_string().contains("EVI"));
}

#[tokio::test]
async fn unknown_tool() {
    let result = registry().execute("weather", json!({})).await;
    assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "weather"));
}

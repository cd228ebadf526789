//! Expression graphs for `value:compute`
//!
//! Earth Engine evaluates a graph of named values; each value is a constant,
//! a reference to another named value, or a function invocation whose
//! arguments are themselves values.

use kissan_core::error::{KissanError, Result};
use kissan_core::models::{
    BandPair, DateRange, ImageCandidate, ProviderGeometry, CLOUD_COVER_PROPERTY,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Image property holding the acquisition time in epoch milliseconds
pub const TIME_START_PROPERTY: &str = "system:time_start";

/// Output band name of `Image.normalizedDifference`
pub const NORMALIZED_DIFFERENCE_BAND: &str = "nd";

pub fn constant<T: Serialize>(value: T) -> Value {
    json!({ "constantValue": value })
}

pub fn reference(name: &str) -> Value {
    json!({ "valueReference": name })
}

pub fn invocation(function_name: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function_name,
            "arguments": arguments,
        }
    })
}

/// Wrap a graph whose result is value `"0"`
fn graph(values: Value) -> Value {
    json!({ "expression": { "result": "0", "values": values } })
}

/// Geometry constructor for a region
///
/// The constructors take fully nested coordinates: a polygon is a list of
/// rings, a multipolygon a list of polygons.
pub fn geometry(region: &ProviderGeometry) -> Value {
    match region {
        ProviderGeometry::Polygon(ring) => invocation(
            "GeometryConstructors.Polygon",
            json!({ "coordinates": constant([ring]) }),
        ),
        ProviderGeometry::MultiPolygon(rings) => {
            let polygons: Vec<[&Vec<[f64; 2]>; 1]> = rings.iter().map(|ring| [ring]).collect();
            invocation(
                "GeometryConstructors.MultiPolygon",
                json!({ "coordinates": constant(polygons) }),
            )
        }
    }
}

/// The collection filtered to `date_range` and `region`, most cloudy first
pub fn ranked_collection(collection: &str, date_range: &DateRange, region: &ProviderGeometry) -> Value {
    let loaded = invocation("ImageCollection.load", json!({ "id": constant(collection) }));

    let by_date = invocation(
        "Collection.filter",
        json!({
            "collection": loaded,
            "filter": invocation("Filter.dateRangeContains", json!({
                "leftValue": invocation("DateRange", json!({
                    "start": constant(date_range.start_millis()),
                    "end": constant(date_range.end_millis()),
                })),
                "rightField": constant(TIME_START_PROPERTY),
            })),
        }),
    );

    let by_region = invocation(
        "Collection.filter",
        json!({
            "collection": by_date,
            "filter": invocation("Filter.intersects", json!({
                "leftField": constant(".all"),
                "rightValue": geometry(region),
            })),
        }),
    );

    // Collection.limit without a count is how sort() serializes
    invocation(
        "Collection.limit",
        json!({
            "collection": by_region,
            "key": constant(CLOUD_COVER_PROPERTY),
            "ascending": constant(false),
        }),
    )
}

/// Every image of the ranked collection as a list
pub fn image_list(collection: &str, date_range: &DateRange, region: &ProviderGeometry) -> Value {
    graph(json!({
        "1": ranked_collection(collection, date_range, region),
        "0": invocation("Collection.toList", json!({
            "collection": reference("1"),
            "count": invocation("Collection.size", json!({ "collection": reference("1") })),
        })),
    }))
}

/// Normalized difference of `bands` on one image, sampled over `region`
pub fn normalized_difference_sample(image_id: &str, bands: BandPair, region: &ProviderGeometry) -> Value {
    graph(json!({
        "0": invocation("Image.sampleRectangle", json!({
            "image": invocation("Image.normalizedDifference", json!({
                "input": invocation("Image.load", json!({ "id": constant(image_id) })),
                "bandNames": constant([bands.first, bands.second]),
            })),
            "region": geometry(region),
        })),
    }))
}

/// Parse the `toList` result into candidates, keeping the server's order
///
/// Images without a cloud-cover property get NaN, which ranks them as the
/// cloudiest.
pub fn parse_image_list(result: &Value) -> Result<Vec<ImageCandidate>> {
    let images = result
        .as_array()
        .ok_or_else(|| KissanError::remote("image list response is not a list"))?;

    images
        .iter()
        .map(|image| {
            let id = image
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| KissanError::remote("image without an id in list response"))?;
            let properties = image.get("properties");
            let millis = properties
                .and_then(|p| p.get(TIME_START_PROPERTY))
                .and_then(Value::as_f64)
                .ok_or_else(|| KissanError::remote(format!("image {} has no {}", id, TIME_START_PROPERTY)))?;
            let cloud_cover = properties
                .and_then(|p| p.get(CLOUD_COVER_PROPERTY))
                .and_then(Value::as_f64)
                .unwrap_or(f64::NAN);
            ImageCandidate::from_millis(id, millis as i64, cloud_cover)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ProviderGeometry {
        ProviderGeometry::Polygon(vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]])
    }

    #[test]
    fn test_polygon_constructor_nesting() {
        let value = geometry(&square());
        let invocation = &value["functionInvocationValue"];
        assert_eq!(invocation["functionName"], "GeometryConstructors.Polygon");
        let coordinates = &invocation["arguments"]["coordinates"]["constantValue"];
        assert_eq!(coordinates[0][2], json!([1.0, 1.0]));
    }

    #[test]
    fn test_multipolygon_constructor_nesting() {
        let ring = vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]];
        let value = geometry(&ProviderGeometry::MultiPolygon(vec![ring.clone(), ring]));
        let coordinates = &value["functionInvocationValue"]["arguments"]["coordinates"]["constantValue"];
        assert_eq!(coordinates.as_array().unwrap().len(), 2);
        assert_eq!(coordinates[1][0][3], json!([0.0, 0.0]));
    }

    #[test]
    fn test_image_list_graph() {
        let range = DateRange::parse("2023-05-01", "2023-06-01").unwrap();
        let body = image_list("COPERNICUS/S2_SR_HARMONIZED", &range, &square());
        let values = &body["expression"]["values"];

        assert_eq!(body["expression"]["result"], "0");
        assert_eq!(values["0"]["functionInvocationValue"]["functionName"], "Collection.toList");
        let sort = &values["1"]["functionInvocationValue"];
        assert_eq!(sort["functionName"], "Collection.limit");
        assert_eq!(sort["arguments"]["key"]["constantValue"], CLOUD_COVER_PROPERTY);
        assert_eq!(sort["arguments"]["ascending"]["constantValue"], false);
    }

    #[test]
    fn test_sample_graph_bands() {
        let body = normalized_difference_sample("img/1", BandPair::new("B8", "B12"), &square());
        let sample = &body["expression"]["values"]["0"]["functionInvocationValue"];
        assert_eq!(sample["functionName"], "Image.sampleRectangle");
        let nd = &sample["arguments"]["image"]["functionInvocationValue"];
        assert_eq!(nd["arguments"]["bandNames"]["constantValue"], json!(["B8", "B12"]));
    }

    #[test]
    fn test_parse_image_list() {
        let result = json!([
            {"type": "Image", "id": "S2/a", "properties": {"system:time_start": 1682935200000i64, "CLOUDY_PIXEL_PERCENTAGE": 40.5}},
            {"type": "Image", "id": "S2/b", "properties": {"system:time_start": 1683021600000i64}},
        ]);
        let candidates = parse_image_list(&result).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].cloud_cover, 40.5);
        assert!(candidates[1].cloud_cover.is_nan());
    }

    #[test]
    fn test_parse_image_list_requires_time() {
        let result = json!([{"id": "S2/a", "properties": {}}]);
        assert!(matches!(parse_image_list(&result), Err(KissanError::RemoteService { .. })));
    }
}

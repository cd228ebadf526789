use serde::Deserialize;

/// Vegetation index request body
#[derive(Debug, Deserialize)]
pub struct IndexRequestBody {
    /// Plot boundary as WKT Polygon or MultiPolygon (lon lat)
    pub wkt: String,
    #[serde(default = "default_index")]
    pub index: String,
    pub start: String,
    pub end: String,
    /// Position among images ranked most to least cloudy; defaults to the least cloudy
    #[serde(default)]
    pub image_index: Option<i64>,
    /// Include the masked grid (outside pixels as null)
    #[serde(default)]
    pub include_grid: bool,
}

fn default_index() -> String {
    "NDVI".to_string()
}

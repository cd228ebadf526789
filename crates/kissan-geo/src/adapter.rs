//! Conversion into the imagery provider's geometry format

use crate::models::{Geometry, ProviderGeometry};

/// Convert a geometry into the provider's coordinate lists
///
/// A polygon becomes its exterior ring as `[lon, lat]` pairs; a multipolygon
/// becomes one such ring per member. Rings keep their closing point.
pub fn to_provider_geometry(geometry: &Geometry) -> ProviderGeometry {
    let exterior = |rings: &Vec<Vec<[f64; 2]>>| rings.first().cloned().unwrap_or_default();
    match geometry {
        Geometry::Polygon { coordinates } => ProviderGeometry::Polygon(exterior(coordinates)),
        Geometry::MultiPolygon { coordinates } => {
            ProviderGeometry::MultiPolygon(coordinates.iter().map(exterior).collect())
        }
    }
}

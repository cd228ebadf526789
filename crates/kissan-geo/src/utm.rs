//! UTM zone lookup

use crate::models::{Geometry, GeometryExt};

/// EPSG code of the WGS 84 UTM zone containing the geometry's centroid
///
/// Northern hemisphere zones are 326xx, southern 327xx. A centroid exactly on
/// the equator counts as southern. `None` for geometries without a centroid.
pub fn utm_zone_epsg(geometry: &Geometry) -> Option<u32> {
    let [lon, lat] = geometry.centroid_coords()?;
    if !lon.is_finite() || !lat.is_finite() {
        return None;
    }
    let zone = (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u32;
    Some(if lat > 0.0 { 32600 + zone } else { 32700 + zone })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_northern_zone() {
        // Punjab, around 75.8E 30.9N
        assert_eq!(utm_zone_epsg(&Geometry::square(75.8, 30.9, 0.01)), Some(32643));
    }

    #[test]
    fn test_southern_zone() {
        // Bali, around 115.2E 8.6S
        assert_eq!(utm_zone_epsg(&Geometry::square(115.2, -8.6, 0.01)), Some(32750));
    }

    #[test]
    fn test_antimeridian_clamped() {
        assert_eq!(utm_zone_epsg(&Geometry::square(179.99, 10.0, 0.005)), Some(32660));
        assert_eq!(utm_zone_epsg(&Geometry::square(-180.0, 10.0, 0.005)), Some(32601));
    }

    #[test]
    fn test_empty_geometry() {
        assert_eq!(utm_zone_epsg(&Geometry::multi_polygon(vec![])), None);
    }
}

//! Well-Known Text boundary
//!
//! Plot boundaries are stored and exchanged as WKT. Parsing goes through the
//! `wkt` crate into `geo` types and then into the canonical model.

use crate::models::{from_geo_geometry, to_geo_geometry, Geometry};
use kissan_core::error::{KissanError, Result};
use wkt::{ToWkt, TryFromWkt};

/// Parse WKT into a polygonal Geometry
///
/// Malformed text fails with `InvalidWkt`; well-formed text of another kind
/// (POINT, LINESTRING, ...) fails with `UnsupportedGeometryKind`.
pub fn from_wkt(text: &str) -> Result<Geometry> {
    let geo_geom = geo::Geometry::<f64>::try_from_wkt_str(text.trim())
        .map_err(|e| KissanError::InvalidWkt { reason: e.to_string() })?;
    from_geo_geometry(&geo_geom)
}

/// Check that `text` is well-formed WKT of any kind, returning it normalized
///
/// Used for plant positions, which are usually points.
pub fn normalize_any_wkt(text: &str) -> Result<String> {
    let geo_geom = geo::Geometry::<f64>::try_from_wkt_str(text.trim())
        .map_err(|e| KissanError::InvalidWkt { reason: e.to_string() })?;
    Ok(geo_geom.wkt_string())
}

/// Serialize a Geometry as WKT
pub fn to_wkt(geometry: &Geometry) -> String {
    to_geo_geometry(geometry).wkt_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kissan_core::models::GeometryKind;

    #[test]
    fn test_unit_square_fixture() {
        let geom = from_wkt("POLYGON((0 0,0 1,1 1,1 0,0 0))").unwrap();
        assert_eq!(geom, Geometry::square(0.0, 0.0, 1.0));

        let text = to_wkt(&geom);
        assert!(text.starts_with("POLYGON"));
        assert_eq!(from_wkt(&text).unwrap(), geom);
    }

    #[test]
    fn test_multipolygon_fixture() {
        let text = "MULTIPOLYGON(((0 0,0 1,1 1,1 0,0 0)),((2 2,2 3,3 3,3 2,2 2)))";
        let geom = from_wkt(text).unwrap();
        assert_eq!(geom.kind(), GeometryKind::MultiPolygon);
        assert_eq!(geom.polygon_count(), 2);
        assert_eq!(from_wkt(&to_wkt(&geom)).unwrap(), geom);
    }

    #[test]
    fn test_point_is_unsupported() {
        let err = from_wkt("POINT(30 10)").unwrap_err();
        assert!(matches!(err, KissanError::UnsupportedGeometryKind { ref kind } if kind == "Point"));
    }

    #[test]
    fn test_any_kind_normalization() {
        let text = normalize_any_wkt("  POINT(75.81 30.9) ").unwrap();
        assert!(text.starts_with("POINT"));
        assert!(normalize_any_wkt("MULTIPOINT((1 2),(3 4))").is_ok());
        assert!(matches!(normalize_any_wkt("POINT(1)"), Err(KissanError::InvalidWkt { .. })));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let err = from_wkt("POLYGON((0 0, 1").unwrap_err();
        assert!(matches!(err, KissanError::InvalidWkt { .. }));
    }
}

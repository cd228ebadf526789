//! Geometry models for kissan-geo.
//!
//! This module re-exports canonical types from `kissan-core` and provides
//! conversions to/from the `geo` crate. Conversions out of `geo` are where
//! non-polygonal kinds get rejected.

use geo::Geometry as GeoGeometry;
use kissan_core::error::{KissanError, Result};

pub use kissan_core::models::{Bounds, Geometry, GeometryKind, ProviderGeometry};

fn to_line_string(ring: &[[f64; 2]]) -> geo::LineString {
    geo::LineString::new(ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn to_geo_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

fn from_geo_polygon(polygon: &geo::Polygon) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(polygon.exterior().coords().map(|c| [c.x, c.y]).collect());
    for interior in polygon.interiors() {
        rings.push(interior.coords().map(|c| [c.x, c.y]).collect());
    }
    rings
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_geo_polygon(coordinates)),
        Geometry::MultiPolygon { .. } => GeoGeometry::MultiPolygon(to_geo_multi_polygon(geom)),
    }
}

/// Any canonical geometry as a multipolygon, the form point-in-area tests use
pub fn to_geo_multi_polygon(geom: &Geometry) -> geo::MultiPolygon {
    match geom {
        Geometry::Polygon { coordinates } => {
            geo::MultiPolygon::new(vec![to_geo_polygon(coordinates)])
        }
        Geometry::MultiPolygon { coordinates } => {
            geo::MultiPolygon::new(coordinates.iter().map(|p| to_geo_polygon(p)).collect())
        }
    }
}

/// Name of a geo::Geometry variant, as reported in errors
pub fn geo_kind_name(geom: &GeoGeometry) -> &'static str {
    match geom {
        GeoGeometry::Point(_) => "Point",
        GeoGeometry::Line(_) => "Line",
        GeoGeometry::LineString(_) => "LineString",
        GeoGeometry::Polygon(_) => "Polygon",
        GeoGeometry::MultiPoint(_) => "MultiPoint",
        GeoGeometry::MultiLineString(_) => "MultiLineString",
        GeoGeometry::MultiPolygon(_) => "MultiPolygon",
        GeoGeometry::GeometryCollection(_) => "GeometryCollection",
        GeoGeometry::Rect(_) => "Rect",
        GeoGeometry::Triangle(_) => "Triangle",
    }
}

/// Convert a geo::Geometry to a canonical Geometry
///
/// Rectangles and triangles are areal and come through as polygons; every
/// other kind fails with `UnsupportedGeometryKind`.
pub fn from_geo_geometry(geom: &GeoGeometry) -> Result<Geometry> {
    match geom {
        GeoGeometry::Polygon(p) => Ok(Geometry::polygon(from_geo_polygon(p))),
        GeoGeometry::MultiPolygon(mp) => {
            Ok(Geometry::multi_polygon(mp.iter().map(from_geo_polygon).collect()))
        }
        GeoGeometry::Rect(r) => Ok(Geometry::polygon(from_geo_polygon(&r.to_polygon()))),
        GeoGeometry::Triangle(t) => Ok(Geometry::polygon(from_geo_polygon(&t.to_polygon()))),
        other => Err(KissanError::UnsupportedGeometryKind { kind: geo_kind_name(other).to_string() }),
    }
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Get the centroid as coordinates
    fn centroid_coords(&self) -> Option<[f64; 2]>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;
        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }
}

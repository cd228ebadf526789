//! Canonical geometry types used across all kissan crates.
//!
//! Only areal geometries enter the model: a farm plot is either a single
//! polygon or a set of polygons. Everything else is rejected at the WKT/geo
//! boundary in `kissan-geo`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryKind::Polygon => write!(f, "Polygon"),
            GeometryKind::MultiPolygon => write!(f, "MultiPolygon"),
        }
    }
}

/// GeoJSON-compatible areal geometry in (longitude, latitude) order
///
/// A polygon is a list of rings, exterior first. A multipolygon is a list of
/// such polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Axis-aligned square with its lower-left corner at (`x`, `y`)
    pub fn square(x: f64, y: f64, size: f64) -> Self {
        Geometry::polygon(vec![vec![
            [x, y],
            [x, y + size],
            [x + size, y + size],
            [x + size, y],
            [x, y],
        ]])
    }

    /// Get the geometry kind
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polygon { .. } => GeometryKind::Polygon,
            Geometry::MultiPolygon { .. } => GeometryKind::MultiPolygon,
        }
    }

    /// Exterior rings, one per member polygon
    pub fn exterior_rings(&self) -> Vec<&[[f64; 2]]> {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(|ring| vec![ring.as_slice()]).unwrap_or_default()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first().map(|ring| ring.as_slice()))
                .collect(),
        }
    }

    /// Number of member polygons
    pub fn polygon_count(&self) -> usize {
        match self {
            Geometry::Polygon { .. } => 1,
            Geometry::MultiPolygon { coordinates } => coordinates.len(),
        }
    }

    /// Bounding box of the exterior rings, `None` when there are no coordinates
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.exterior_rings().into_iter().flatten();
        let first = points.next()?;
        let init = Bounds { min_x: first[0], min_y: first[1], max_x: first[0], max_y: first[1] };
        Some(points.fold(init, |b, p| Bounds {
            min_x: b.min_x.min(p[0]),
            min_y: b.min_y.min(p[1]),
            max_x: b.max_x.max(p[0]),
            max_y: b.max_y.max(p[1]),
        }))
    }
}

/// Bounding box in geometry coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Geometry in the coordinate-list format the imagery provider's constructors take
///
/// Polygons carry their exterior ring only; multipolygons carry one exterior
/// ring per member. Interior rings are dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProviderGeometry {
    Polygon(Vec<[f64; 2]>),
    MultiPolygon(Vec<Vec<[f64; 2]>>),
}

impl ProviderGeometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            ProviderGeometry::Polygon(_) => GeometryKind::Polygon,
            ProviderGeometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }
}

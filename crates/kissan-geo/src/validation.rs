use crate::models::Geometry;
use kissan_core::error::{KissanError, Result};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate a geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => validate_multipolygon(coordinates),
    }
}

/// Validate and turn the first problem into an `InvalidGeometry` error
pub fn ensure_valid(geometry: &Geometry) -> Result<()> {
    let validation = validate_geometry(geometry);
    match validation.errors.into_iter().next() {
        None => Ok(()),
        Some(error) => {
            Err(KissanError::InvalidGeometry { location: error.location, reason: error.reason })
        }
    }
}

fn validate_ring(name: &str, ring: &[[f64; 2]]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if ring.len() < 4 {
        result.add_error(
            name.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                name.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    for (i, coord) in ring.iter().enumerate() {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            result.add_error(format!("{}[{}]", name, i), "Coordinates must be finite".to_string());
        }
    }

    result
}

fn validate_polygon(rings: &[Vec<[f64; 2]>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    };

    result.absorb("Polygon", validate_ring("exterior", exterior));
    for (i, interior) in interiors.iter().enumerate() {
        result.absorb("Polygon", validate_ring(&format!("interior[{}]", i), interior));
    }

    result
}

fn validate_multipolygon(polygons: &[Vec<Vec<[f64; 2]>>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if polygons.is_empty() {
        result.add_error("MultiPolygon".to_string(), "MultiPolygon has no members".to_string());
    }

    for (i, polygon) in polygons.iter().enumerate() {
        result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_valid() {
        assert!(validate_geometry(&Geometry::square(0.0, 0.0, 1.0)).is_valid);
        assert!(ensure_valid(&Geometry::square(10.0, 10.0, 0.5)).is_ok());
    }

    #[test]
    fn test_open_ring() {
        let geom = Geometry::polygon(vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]]);
        let err = ensure_valid(&geom).unwrap_err();
        match err {
            KissanError::InvalidGeometry { location, reason } => {
                assert_eq!(location, "Polygon.exterior");
                assert!(reason.contains("closed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_few_points() {
        let geom = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]);
        let result = validate_geometry(&geom);
        assert!(!result.is_valid);
        assert!(result.errors[0].reason.contains("at least 4 points"));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let geom = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [0.0, f64::NAN],
            [1.0, 1.0],
            [0.0, 0.0],
        ]]);
        let result = validate_geometry(&geom);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].location, "Polygon.exterior[1]");
    }

    #[test]
    fn test_multipolygon_member_location() {
        let geom = Geometry::multi_polygon(vec![
            vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![],
        ]);
        let err = ensure_valid(&geom).unwrap_err();
        assert!(
            matches!(err, KissanError::InvalidGeometry { ref location, .. } if location == "MultiPolygon[1].Polygon")
        );
    }

    #[test]
    fn test_empty_multipolygon() {
        assert!(!validate_geometry(&Geometry::multi_polygon(vec![])).is_valid);
    }
}

//! Geometry rasterization onto a pixel grid
//!
//! The grid spans the geometry's bounding box: row 0 is the northern edge and
//! column 0 the western edge. A pixel is burned when its centre lies strictly
//! inside the geometry; boundary and exterior pixels are NaN.

use crate::models::{to_geo_multi_polygon, Geometry};
use geo::algorithm::contains::Contains;
use ndarray::Array2;

/// Rasterize `geometry` into a `(rows, cols)` grid
///
/// Interior pixels get `burn_value`, everything else NaN. A degenerate
/// bounding box (zero width or height) burns nothing.
pub fn rasterize(geometry: &Geometry, shape: (usize, usize), burn_value: f64) -> Array2<f64> {
    let (rows, cols) = shape;
    let mut grid = Array2::from_elem(shape, f64::NAN);

    let Some(bounds) = geometry.bounds() else {
        return grid;
    };
    if rows == 0 || cols == 0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        tracing::debug!(rows, cols, "Degenerate raster extent, mask is empty");
        return grid;
    }

    let pixel_width = bounds.width() / cols as f64;
    let pixel_height = bounds.height() / rows as f64;
    let area = to_geo_multi_polygon(geometry);

    for ((row, col), value) in grid.indexed_iter_mut() {
        let x = bounds.min_x + (col as f64 + 0.5) * pixel_width;
        let y = bounds.max_y - (row as f64 + 0.5) * pixel_height;
        if area.contains(&geo::Point::new(x, y)) {
            *value = burn_value;
        }
    }

    grid
}

/// Number of burned (non-NaN) pixels
pub fn burned_count(mask: &Array2<f64>) -> usize {
    mask.iter().filter(|v| !v.is_nan()).count()
}

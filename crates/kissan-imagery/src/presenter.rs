//! Masked vegetation index maps

use chrono::{DateTime, Utc};
use kissan_core::error::{KissanError, Result};
use kissan_core::models::{IndexResult, VegetationIndexKind};
use ndarray::{Array2, Zip};
use serde::Serialize;
use serde_json::{json, Value};

/// Characters from lowest (-1) to highest (+1) index value
const ASCII_RAMP: &[u8] = b".:-=+*#%@";

/// Summary statistics over the finite pixels of a map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub valid_pixels: usize,
    pub total_pixels: usize,
}

impl MapStats {
    pub fn from_grid(grid: &Array2<f64>) -> Self {
        let finite: Vec<f64> = grid.iter().copied().filter(|v| v.is_finite()).collect();
        let (min, max, mean) = if finite.is_empty() {
            (None, None, None)
        } else {
            let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
            let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = finite.iter().sum::<f64>() / finite.len() as f64;
            (Some(min), Some(max), Some(mean))
        };
        Self { min, max, mean, valid_pixels: finite.len(), total_pixels: grid.len() }
    }
}

/// A vegetation index grid masked to the plot, ready for display
#[derive(Debug, Clone)]
pub struct MapView {
    /// `"{KIND} : {YYYY-MM-DD}"`
    pub title: String,
    pub kind: VegetationIndexKind,
    pub acquired_at: DateTime<Utc>,
    pub image_id: String,
    /// Index values inside the plot, NaN outside
    pub grid: Array2<f64>,
    pub stats: MapStats,
}

/// Mask `result` with `mask` (burn value inside, NaN outside)
pub fn present(result: &IndexResult, mask: &Array2<f64>) -> Result<MapView> {
    if result.values.dim() != mask.dim() {
        return Err(KissanError::ShapeMismatch { left: result.values.dim(), right: mask.dim() });
    }
    let grid = Zip::from(&result.values).and(mask).map_collect(|&value, &burn| value * burn);
    let stats = MapStats::from_grid(&grid);

    Ok(MapView {
        title: format!("{} : {}", result.kind.label(), result.date_label()),
        kind: result.kind,
        acquired_at: result.acquired_at,
        image_id: result.image_id.clone(),
        grid,
        stats,
    })
}

impl MapView {
    pub fn shape(&self) -> (usize, usize) {
        self.grid.dim()
    }

    /// Terminal rendering, one character per pixel; blank outside the plot
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.grid.len() + self.grid.nrows() + self.title.len() + 1);
        out.push_str(&self.title);
        out.push('\n');
        for row in self.grid.rows() {
            for value in row {
                out.push(ramp_char(*value));
            }
            out.push('\n');
        }
        out
    }

    /// Metadata and statistics without the grid
    pub fn summary_json(&self) -> Value {
        let (rows, cols) = self.shape();
        json!({
            "title": self.title,
            "index": self.kind,
            "date": self.acquired_at.format("%Y-%m-%d").to_string(),
            "acquired_at": self.acquired_at.to_rfc3339(),
            "image_id": self.image_id,
            "rows": rows,
            "cols": cols,
            "stats": self.stats,
        })
    }

    /// Full export; pixels outside the plot are `null`
    pub fn to_json(&self) -> Value {
        let grid: Vec<Vec<Value>> = self
            .grid
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|v| Value::from(*v)).collect())
            .collect();
        let mut value = self.summary_json();
        value["grid"] = Value::from(grid);
        value
    }
}

fn ramp_char(value: f64) -> char {
    if !value.is_finite() {
        return ' ';
    }
    let normalized = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) * (ASCII_RAMP.len() - 1) as f64;
    ASCII_RAMP[normalized.round() as usize] as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::array;

    fn result(values: Array2<f64>) -> IndexResult {
        IndexResult {
            values,
            acquired_at: Utc.with_ymd_and_hms(2023, 5, 14, 5, 36, 0).unwrap(),
            image_id: "COPERNICUS/S2_SR_HARMONIZED/20230514".to_string(),
            kind: VegetationIndexKind::Ndvi,
        }
    }

    #[test]
    fn test_masking_and_title() {
        let mask = array![[1.0, f64::NAN], [1.0, 1.0]];
        let view = present(&result(array![[0.5, 0.9], [-0.2, 0.1]]), &mask).unwrap();

        assert_eq!(view.title, "NDVI : 2023-05-14");
        assert!(view.grid[[0, 1]].is_nan());
        assert_eq!(view.stats.valid_pixels, 3);
        assert_eq!(view.stats.total_pixels, 4);
        assert_eq!(view.stats.max, Some(0.5));
        assert_eq!(view.stats.min, Some(-0.2));
        assert!((view.stats.mean.unwrap() - 0.4 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = present(&result(Array2::zeros((2, 2))), &Array2::zeros((3, 2))).unwrap_err();
        assert!(matches!(err, KissanError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_all_masked_has_no_stats() {
        let view = present(&result(array![[0.3]]), &array![[f64::NAN]]).unwrap();
        assert_eq!(view.stats.valid_pixels, 0);
        assert!(view.stats.mean.is_none());
    }

    #[test]
    fn test_ascii_render() {
        let view = present(&result(array![[-1.0, 1.0, 0.0]]), &array![[1.0, 1.0, f64::NAN]]).unwrap();
        assert_eq!(view.render_ascii(), "NDVI : 2023-05-14\n.@ \n");
    }

    #[test]
    fn test_json_export_nulls() {
        let view = present(&result(array![[0.25, 0.5]]), &array![[f64::NAN, 1.0]]).unwrap();
        let json = view.to_json();
        assert_eq!(json["grid"], json!([[null, 0.5]]));
        assert_eq!(json["index"], "NDVI");
        assert_eq!(json["date"], "2023-05-14");
        assert_eq!(json["stats"]["valid_pixels"], 1);
    }
}

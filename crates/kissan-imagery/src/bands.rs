//! Normalized-difference band math and sample materialization

use kissan_core::error::{KissanError, Result};
use ndarray::{Array2, Zip};
use serde_json::Value;

/// Elementwise `(first - second) / (first + second)`
///
/// Pixels where the denominator is zero are NaN, as are pixels where either
/// input is NaN.
pub fn normalized_difference(first: &Array2<f64>, second: &Array2<f64>) -> Result<Array2<f64>> {
    if first.dim() != second.dim() {
        return Err(KissanError::ShapeMismatch { left: first.dim(), right: second.dim() });
    }
    Ok(Zip::from(first).and(second).map_collect(|&a, &b| {
        let sum = a + b;
        if sum == 0.0 {
            f64::NAN
        } else {
            (a - b) / sum
        }
    }))
}

/// Turn a sampled rectangle into a dense grid
///
/// `sample` is the feature returned by the provider; the band values live
/// under `properties.<band>` as a list of rows. `null` pixels become NaN.
pub fn materialize_sample(sample: &Value, band: &str) -> Result<Array2<f64>> {
    let rows = sample
        .get("properties")
        .and_then(|p| p.get(band))
        .and_then(Value::as_array)
        .ok_or_else(|| KissanError::remote(format!("malformed sample: no '{}' band", band)))?;

    let width = rows.first().and_then(Value::as_array).map(Vec::len).unwrap_or(0);
    let mut values = Vec::with_capacity(rows.len() * width);

    for (r, row) in rows.iter().enumerate() {
        let row = row
            .as_array()
            .ok_or_else(|| KissanError::remote(format!("malformed sample: row {} is not a list", r)))?;
        if row.len() != width {
            return Err(KissanError::remote(format!(
                "malformed sample: row {} has {} pixels, expected {}",
                r,
                row.len(),
                width
            )));
        }
        for pixel in row {
            match pixel {
                Value::Null => values.push(f64::NAN),
                other => values.push(other.as_f64().ok_or_else(|| {
                    KissanError::remote(format!("malformed sample: non-numeric pixel {}", other))
                })?),
            }
        }
    }

    Array2::from_shape_vec((rows.len(), width), values)
        .map_err(|e| KissanError::remote(format!("malformed sample: {}", e)))
}

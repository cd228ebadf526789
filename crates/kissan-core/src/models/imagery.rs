//! Satellite imagery query and result types

use crate::error::{KissanError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel-2 surface reflectance, harmonized processing baseline
pub const SENTINEL2_SR_HARMONIZED: &str = "COPERNICUS/S2_SR_HARMONIZED";

/// Image property holding the cloud-cover percentage used for ranking
pub const CLOUD_COVER_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Acquisition window; `start` inclusive, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(KissanError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse from `YYYY-MM-DD` (midnight UTC) or RFC 3339 strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Whether `t` falls within `[start, end)`
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// Parse a calendar date or an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }
    DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.with_timezone(&Utc)).map_err(|e| {
        KissanError::InvalidDate {
            value: value.to_string(),
            reason: format!("expected YYYY-MM-DD or RFC 3339 ({})", e),
        }
    })
}

/// Spectral band identifiers combined by a normalized difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandPair {
    pub first: &'static str,
    pub second: &'static str,
}

impl BandPair {
    pub const fn new(first: &'static str, second: &'static str) -> Self {
        Self { first, second }
    }
}

/// Vegetation index computed from a Sentinel-2 image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VegetationIndexKind {
    /// Normalized Difference Vegetation Index
    Ndvi,
    /// Normalized Difference Water Index (NIR/SWIR variant)
    Ndwi,
}

impl VegetationIndexKind {
    pub const ALL: [VegetationIndexKind; 2] = [VegetationIndexKind::Ndvi, VegetationIndexKind::Ndwi];

    /// Band pair for this index
    pub fn bands(&self) -> BandPair {
        match self {
            VegetationIndexKind::Ndvi => BandPair::new("B8", "B4"),
            VegetationIndexKind::Ndwi => BandPair::new("B8", "B12"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VegetationIndexKind::Ndvi => "NDVI",
            VegetationIndexKind::Ndwi => "NDWI",
        }
    }
}

impl fmt::Display for VegetationIndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VegetationIndexKind {
    type Err = KissanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NDVI" => Ok(VegetationIndexKind::Ndvi),
            "NDWI" => Ok(VegetationIndexKind::Ndwi),
            _ => Err(KissanError::UnsupportedIndexKind { kind: s.to_string() }),
        }
    }
}

/// A provider image that matched the date and geometry filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    /// Provider asset id (e.g. `COPERNICUS/S2_SR_HARMONIZED/20230501T...`)
    pub id: String,
    pub acquired_at: DateTime<Utc>,
    /// Cloud-cover percentage, 0 to 100
    pub cloud_cover: f64,
}

impl ImageCandidate {
    pub fn new(id: impl Into<String>, acquired_at: DateTime<Utc>, cloud_cover: f64) -> Self {
        Self { id: id.into(), acquired_at, cloud_cover }
    }

    /// Build from an acquisition time in milliseconds since the Unix epoch
    pub fn from_millis(id: impl Into<String>, millis: i64, cloud_cover: f64) -> Result<Self> {
        let acquired_at = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            KissanError::remote(format!("acquisition time {} ms is out of range", millis))
        })?;
        Ok(Self::new(id, acquired_at, cloud_cover))
    }
}

/// Which ranked candidate to use
///
/// Candidates are ranked by cloud cover, most cloudy first, so `Last` picks
/// the least cloudy image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSelection {
    #[default]
    Last,
    /// Position in the ranked list; negative values count from the end
    Index(i64),
}

impl ImageSelection {
    /// Resolve against a list of `len` candidates
    pub fn resolve(&self, len: usize) -> Option<usize> {
        let index = match self {
            ImageSelection::Last => -1,
            ImageSelection::Index(i) => *i,
        };
        let len_i = i64::try_from(len).ok()?;
        let resolved = if index < 0 { len_i + index } else { index };
        if (0..len_i).contains(&resolved) {
            usize::try_from(resolved).ok()
        } else {
            None
        }
    }

    pub fn as_index(&self) -> i64 {
        match self {
            ImageSelection::Last => -1,
            ImageSelection::Index(i) => *i,
        }
    }
}

impl From<i64> for ImageSelection {
    fn from(index: i64) -> Self {
        if index == -1 {
            ImageSelection::Last
        } else {
            ImageSelection::Index(index)
        }
    }
}

/// Parameters of a single vegetation index fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRequest {
    pub collection: String,
    pub date_range: DateRange,
    pub kind: VegetationIndexKind,
    pub selection: ImageSelection,
}

impl IndexRequest {
    /// Request against the default Sentinel-2 collection, least cloudy image
    pub fn new(date_range: DateRange, kind: VegetationIndexKind) -> Self {
        Self {
            collection: SENTINEL2_SR_HARMONIZED.to_string(),
            date_range,
            kind,
            selection: ImageSelection::Last,
        }
    }

    /// Parse string-typed arguments as tools receive them
    pub fn from_args(kind: &str, start: &str, end: &str) -> Result<Self> {
        let kind: VegetationIndexKind = kind.parse()?;
        let date_range = DateRange::parse(start, end)?;
        Ok(Self::new(date_range, kind))
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_selection(mut self, selection: ImageSelection) -> Self {
        self.selection = selection;
        self
    }
}

/// Normalized-difference grid for one image
#[derive(Debug, Clone)]
pub struct IndexResult {
    pub values: Array2<f64>,
    pub acquired_at: DateTime<Utc>,
    pub image_id: String,
    pub kind: VegetationIndexKind,
}

impl IndexResult {
    /// Grid shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Calendar date of the acquisition, `YYYY-MM-DD`
    pub fn date_label(&self) -> String {
        self.acquired_at.to_string().chars().take(10).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_table() {
        assert_eq!(VegetationIndexKind::Ndvi.bands(), BandPair::new("B8", "B4"));
        assert_eq!(VegetationIndexKind::Ndwi.bands(), BandPair::new("B8", "B12"));
    }

    #[test]
    fn test_index_kind_parsing() {
        assert_eq!("ndvi".parse::<VegetationIndexKind>().unwrap(), VegetationIndexKind::Ndvi);
        assert_eq!(" NDWI ".parse::<VegetationIndexKind>().unwrap(), VegetationIndexKind::Ndwi);

        let err = "EVI".parse::<VegetationIndexKind>().unwrap_err();
        assert!(matches!(err, KissanError::UnsupportedIndexKind { ref kind } if kind == "EVI"));
    }

    #[test]
    fn test_date_range_parsing() {
        let range = DateRange::parse("2023-05-01", "2023-06-01").unwrap();
        assert_eq!(range.to_string(), "2023-05-01..2023-06-01");
        assert!(range.contains(range.start));
        assert!(!range.contains(range.end));

        let rfc = DateRange::parse("2023-05-01T10:00:00Z", "2023-05-01T12:00:00+02:00").unwrap();
        assert_eq!(rfc.start, rfc.end);
    }

    #[test]
    fn test_date_range_rejects_reversed() {
        let err = DateRange::parse("2023-06-01", "2023-05-01").unwrap_err();
        assert!(matches!(err, KissanError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_invalid_date() {
        let err = DateRange::parse("yesterday", "2023-05-01").unwrap_err();
        assert!(matches!(err, KissanError::InvalidDate { ref value, .. } if value == "yesterday"));
    }

    #[test]
    fn test_selection_resolution() {
        assert_eq!(ImageSelection::Last.resolve(3), Some(2));
        assert_eq!(ImageSelection::Index(0).resolve(3), Some(0));
        assert_eq!(ImageSelection::Index(-3).resolve(3), Some(0));
        assert_eq!(ImageSelection::Index(-4).resolve(3), None);
        assert_eq!(ImageSelection::Index(3).resolve(3), None);
        assert_eq!(ImageSelection::Last.resolve(0), None);
        assert_eq!(ImageSelection::from(-1), ImageSelection::Last);
    }

    #[test]
    fn test_candidate_from_millis() {
        let candidate = ImageCandidate::from_millis("img", 1_682_935_200_000, 12.5).unwrap();
        assert_eq!(candidate.acquired_at.to_rfc3339(), "2023-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_request_from_args() {
        let request = IndexRequest::from_args("ndwi", "2023-01-01", "2023-02-01").unwrap();
        assert_eq!(request.kind, VegetationIndexKind::Ndwi);
        assert_eq!(request.collection, SENTINEL2_SR_HARMONIZED);
        assert_eq!(request.selection, ImageSelection::Last);
    }

    #[test]
    fn test_date_label() {
        let result = IndexResult {
            values: Array2::zeros((1, 1)),
            acquired_at: Utc.with_ymd_and_hms(2023, 5, 1, 10, 30, 0).unwrap(),
            image_id: "img".to_string(),
            kind: VegetationIndexKind::Ndvi,
        };
        assert_eq!(result.date_label(), "2023-05-01");
        assert_eq!(result.shape(), (1, 1));
    }
}

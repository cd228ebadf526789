//! In-process imagery provider for tests and offline runs

use async_trait::async_trait;
use kissan_core::error::{KissanError, Result};
use kissan_core::models::{BandPair, DateRange, ImageCandidate, ProviderGeometry};
use kissan_core::ports::ImageryProvider;
use ndarray::Array2;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bands::normalized_difference;

/// An image held in memory with its band rasters
#[derive(Debug, Clone)]
struct StaticImage {
    candidate: ImageCandidate,
    bands: HashMap<String, Array2<f64>>,
}

/// Imagery provider serving a fixed set of images
///
/// Images are filtered by date range only and returned in insertion order,
/// unranked. Call counters let tests assert which stages ran.
#[derive(Debug, Default)]
pub struct StaticImageryProvider {
    images: Vec<StaticImage>,
    list_calls: AtomicUsize,
    sample_calls: AtomicUsize,
}

impl StaticImageryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image with explicit band rasters
    pub fn with_image(
        mut self,
        candidate: ImageCandidate,
        bands: impl IntoIterator<Item = (&'static str, Array2<f64>)>,
    ) -> Self {
        let bands = bands.into_iter().map(|(name, raster)| (name.to_string(), raster)).collect();
        self.images.push(StaticImage { candidate, bands });
        self
    }

    /// Add an image whose bands are constant over a `shape` grid
    pub fn with_uniform_image(
        self,
        candidate: ImageCandidate,
        shape: (usize, usize),
        band_values: &[(&'static str, f64)],
    ) -> Self {
        let bands: Vec<_> = band_values
            .iter()
            .map(|(name, value)| (*name, Array2::from_elem(shape, *value)))
            .collect();
        self.with_image(candidate, bands)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn sample_calls(&self) -> usize {
        self.sample_calls.load(Ordering::SeqCst)
    }

    fn band<'a>(&'a self, image: &'a StaticImage, name: &str) -> Result<&'a Array2<f64>> {
        image.bands.get(name).ok_or_else(|| {
            KissanError::remote(format!("Image {} has no band {}", image.candidate.id, name))
        })
    }
}

#[async_trait]
impl ImageryProvider for StaticImageryProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_images(
        &self,
        _collection: &str,
        date_range: &DateRange,
        _region: &ProviderGeometry,
    ) -> Result<Vec<ImageCandidate>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .images
            .iter()
            .filter(|image| date_range.contains(image.candidate.acquired_at))
            .map(|image| image.candidate.clone())
            .collect())
    }

    async fn sample_normalized_difference(
        &self,
        image: &ImageCandidate,
        bands: BandPair,
        _region: &ProviderGeometry,
    ) -> Result<Array2<f64>> {
        self.sample_calls.fetch_add(1, Ordering::SeqCst);
        let stored = self
            .images
            .iter()
            .find(|candidate| candidate.candidate.id == image.id)
            .ok_or_else(|| KissanError::remote(format!("Unknown image {}", image.id)))?;
        normalized_difference(self.band(stored, bands.first)?, self.band(stored, bands.second)?)
    }
}

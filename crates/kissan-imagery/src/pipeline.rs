//! Vegetation index pipeline
//!
//! Stages run in order, each awaiting the provider before the next starts:
//! validate and adapt the geometry, list and rank candidate images, select
//! one, then sample its normalized difference. `map_index` adds the plot mask
//! and the presented map on top.

use kissan_core::error::{KissanError, Result};
use kissan_core::models::{
    Geometry, ImageCandidate, ImageSelection, IndexRequest, IndexResult,
};
use kissan_core::ports::ImageryProvider;
use kissan_geo::{rasterize, to_provider_geometry, validation::ensure_valid};
use std::sync::Arc;
use tracing::{debug, info};

use crate::presenter::{present, MapView};

/// Value burned into plot pixels; multiplying by it leaves index values as-is
const MASK_BURN_VALUE: f64 = 1.0;

/// Rank candidates by cloud cover, most cloudy first
///
/// The sort is stable, so equally cloudy images keep the provider's order.
/// With this ranking the last candidate is the least cloudy one.
pub fn rank_candidates(mut candidates: Vec<ImageCandidate>) -> Vec<ImageCandidate> {
    candidates.sort_by(|a, b| b.cloud_cover.total_cmp(&a.cloud_cover));
    candidates
}

/// Vegetation index pipeline over a shared imagery provider
#[derive(Clone)]
pub struct SentinelIndexer {
    provider: Arc<dyn ImageryProvider>,
}

impl SentinelIndexer {
    pub fn new(provider: Arc<dyn ImageryProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch the index grid of the selected image over `geometry`
    pub async fn fetch_index(&self, geometry: &Geometry, request: &IndexRequest) -> Result<IndexResult> {
        ensure_valid(geometry)?;
        let region = to_provider_geometry(geometry);

        // Stage 1: candidate images
        let listed = self
            .provider
            .list_images(&request.collection, &request.date_range, &region)
            .await?;
        let candidates = rank_candidates(listed);
        debug!(
            provider = self.provider.name(),
            collection = %request.collection,
            geometry = %region.kind(),
            date_range = %request.date_range,
            candidates = candidates.len(),
            "Ranked candidate images"
        );

        // Stage 2: selection
        if candidates.is_empty() {
            return Err(KissanError::EmptyCollection {
                collection: request.collection.clone(),
                start: request.date_range.start.format("%Y-%m-%d").to_string(),
                end: request.date_range.end.format("%Y-%m-%d").to_string(),
            });
        }
        let position = request.selection.resolve(candidates.len()).ok_or(
            KissanError::SelectionOutOfRange {
                index: request.selection.as_index(),
                len: candidates.len(),
            },
        )?;
        let selected = &candidates[position];

        // Stage 3: band math on the selected image
        let bands = request.kind.bands();
        let values = self.provider.sample_normalized_difference(selected, bands, &region).await?;

        info!(
            image = %selected.id,
            cloud_cover = selected.cloud_cover,
            index = %request.kind,
            rows = values.nrows(),
            cols = values.ncols(),
            "Computed vegetation index"
        );

        Ok(IndexResult {
            values,
            acquired_at: selected.acquired_at,
            image_id: selected.id.clone(),
            kind: request.kind,
        })
    }

    /// Like `fetch_index`, with the string-typed arguments tools receive
    ///
    /// The index kind is checked before anything goes to the provider.
    pub async fn fetch_index_for_args(
        &self,
        geometry: &Geometry,
        kind: &str,
        start: &str,
        end: &str,
        selection: ImageSelection,
    ) -> Result<IndexResult> {
        let request = IndexRequest::from_args(kind, start, end)?.with_selection(selection);
        self.fetch_index(geometry, &request).await
    }

    /// Fetch the index and mask it to the geometry
    pub async fn map_index(&self, geometry: &Geometry, request: &IndexRequest) -> Result<MapView> {
        let result = self.fetch_index(geometry, request).await?;
        let mask = rasterize(geometry, result.shape(), MASK_BURN_VALUE);
        present(&result, &mask)
    }
}

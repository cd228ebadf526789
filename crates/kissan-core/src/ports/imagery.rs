use crate::error::Result;
use crate::models::{BandPair, DateRange, ImageCandidate, ProviderGeometry};
use async_trait::async_trait;
use ndarray::Array2;

/// Port for a remote satellite imagery provider
///
/// Implementations must be safe to share across concurrent pipeline runs.
/// None of the methods retry; transport and auth failures surface as
/// `KissanError::RemoteService`.
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Provider name for logs and diagnostics
    fn name(&self) -> &str;

    /// List images of `collection` acquired within `date_range` whose footprint
    /// intersects `region`
    async fn list_images(
        &self,
        collection: &str,
        date_range: &DateRange,
        region: &ProviderGeometry,
    ) -> Result<Vec<ImageCandidate>>;

    /// Compute `(first - second) / (first + second)` on `image` and sample it
    /// over the bounding rectangle of `region`
    ///
    /// Pixels without a value are returned as NaN.
    async fn sample_normalized_difference(
        &self,
        image: &ImageCandidate,
        bands: BandPair,
        region: &ProviderGeometry,
    ) -> Result<Array2<f64>>;
}

//! KissanSat Imagery - Vegetation index retrieval and presentation
//!
//! The pipeline filters a remote image collection by date and geometry, ranks
//! the candidates by cloud cover, computes a normalized-difference index on
//! the selected image and masks it with the rasterized geometry.

pub mod bands;
pub mod earth_engine;
pub mod pipeline;
pub mod presenter;
pub mod stub;

pub use earth_engine::EarthEngineClient;
pub use pipeline::{rank_candidates, SentinelIndexer};
pub use presenter::{MapStats, MapView};
pub use stub::StaticImageryProvider;

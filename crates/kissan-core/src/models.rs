pub mod farm;
pub mod geometry;
pub mod imagery;

pub use farm::{PlantSeason, Plot, PlotSeason, Species, User, Variety, VegetationBed};
pub use geometry::{Bounds, Geometry, GeometryKind, ProviderGeometry};
pub use imagery::{
    BandPair, DateRange, ImageCandidate, ImageSelection, IndexRequest, IndexResult,
    VegetationIndexKind, CLOUD_COVER_PROPERTY, SENTINEL2_SR_HARMONIZED,
};

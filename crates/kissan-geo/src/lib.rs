//! KissanSat Geo - Geometry conversion, validation and rasterization
//!
//! This crate owns the boundary between the closed polygonal geometry model
//! and the outside world: WKT text, the `geo` crate, the imagery provider's
//! coordinate lists, and pixel grids.

pub mod adapter;
pub mod models;
pub mod raster;
pub mod utm;
pub mod validation;
pub mod wkt;

pub use adapter::to_provider_geometry;
pub use raster::rasterize;
pub use utm::utm_zone_epsg;
pub use self::wkt::{from_wkt, to_wkt};

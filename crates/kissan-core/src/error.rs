//! Error types for KissanSat

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KissanError {
    // Geometry errors
    #[error("Unsupported geometry kind: {kind}. Supported geometries are Polygon and MultiPolygon")]
    UnsupportedGeometryKind { kind: String },

    #[error("Invalid geometry at {location}: {reason}")]
    InvalidGeometry { location: String, reason: String },

    #[error("Invalid WKT: {reason}")]
    InvalidWkt { reason: String },

    // Query errors
    #[error("Unsupported vegetation index: {kind}. Use NDVI or NDWI")]
    UnsupportedIndexKind { kind: String },

    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("No images in {collection} between {start} and {end} for the requested geometry")]
    EmptyCollection {
        collection: String,
        start: String,
        end: String,
    },

    #[error("Image index {index} is out of range for {len} candidate images")]
    SelectionOutOfRange { index: i64, len: usize },

    #[error("Grid shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    // Provider errors
    #[error("Imagery provider error: {reason}")]
    RemoteService { reason: String },

    #[error("Credentials file not found at {path}")]
    CredentialsNotFound { path: PathBuf },

    #[error("Invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    // Farm database errors
    #[error("No plot named '{plot}' for user {email}")]
    UpstreamLookup { plot: String, email: String },

    #[error("{entity} not found: {key}")]
    RecordNotFound { entity: String, key: String },

    #[error("{entity} already exists: {key}")]
    DuplicateRecord { entity: String, key: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl KissanError {
    /// Shorthand for a remote provider failure
    pub fn remote(reason: impl Into<String>) -> Self {
        KissanError::RemoteService { reason: reason.into() }
    }

    /// Whether the caller may reasonably retry the same request later
    pub fn is_transient(&self) -> bool {
        matches!(self, KissanError::RemoteService { .. })
    }
}

pub type Result<T> = std::result::Result<T, KissanError>;

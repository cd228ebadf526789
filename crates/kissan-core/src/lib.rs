//! KissanSat Core - Domain models, configuration, and ports
//!
//! This crate contains the domain types shared by the imagery pipeline, the
//! farm store, and the tool layer, plus the port traits adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{KissanError, Result};

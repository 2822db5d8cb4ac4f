//! Common types shared across the contour map-to-terrain pipeline.

pub mod bounds;
pub mod config;
pub mod crs;
pub mod error;

pub use bounds::GeoBounds;
pub use config::{PipelineConfig, ResampleFilter, DEFAULT_MAX_DECODE_BYTES};
pub use crs::EpsgCode;
pub use error::{BoxError, RemoteService, TerrainError, TerrainResult};

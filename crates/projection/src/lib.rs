//! Coordinate reference system transformations.
//!
//! EPSG codes resolve to PROJ.4 definitions and are transformed with `proj4rs`.
//! Web Mercator to WGS84 takes an inline fast path.

pub mod bounds;
pub mod definitions;
pub mod mercator;
pub mod transform;

pub use bounds::{transform_bounds, DEFAULT_DENSIFY_POINTS};
pub use definitions::proj_string;
pub use transform::CoordTransformer;

use terrain_common::{EpsgCode, TerrainError};

/// Errors raised while building or applying a transform.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("{0} is not in the supported CRS table")]
    UnsupportedCrs(EpsgCode),

    #[error("invalid projection definition for {code}: {message}")]
    InvalidDefinition { code: EpsgCode, message: String },

    #[error("transform failed: {0}")]
    TransformFailed(String),
}

impl From<ProjectionError> for TerrainError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::UnsupportedCrs(code) => TerrainError::UnsupportedCrs(code.to_string()),
            other => TerrainError::Projection(other.to_string()),
        }
    }
}

//! Error types for GeoTIFF decoding.

use terrain_common::{BoxError, TerrainError};
use thiserror::Error;

/// Result type for GeoTIFF parser operations.
pub type GeoTiffResult<T> = Result<T, GeoTiffError>;

/// Error types for GeoTIFF decoding.
#[derive(Error, Debug)]
pub enum GeoTiffError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Content is not a TIFF at all
    #[error("Not a TIFF file: {0}")]
    NotTiff(String),

    /// TIFF structure or pixel data could not be decoded
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Sample layout the decoder does not handle
    #[error("Unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    /// No usable georeferencing tags
    #[error("Missing georeference: {0}")]
    MissingGeoreference(String),

    /// GeoKeys are present but malformed
    #[error("Invalid georeference: {0}")]
    InvalidGeoreference(String),

    /// CRS is user-defined or not resolvable to an EPSG code
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// Reprojection failed
    #[error("Projection failed: {0}")]
    Projection(TerrainError),
}

impl GeoTiffError {
    pub fn decode(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl From<GeoTiffError> for TerrainError {
    fn from(err: GeoTiffError) -> Self {
        match err {
            GeoTiffError::IoError(e) => TerrainError::Io(e),
            GeoTiffError::NotTiff(msg) => TerrainError::UnsupportedFormat(msg),
            GeoTiffError::Decode { context, source } => {
                TerrainError::ImageProcessingFailure { context, source }
            }
            GeoTiffError::UnsupportedLayout(msg) => TerrainError::UnsupportedFormat(msg),
            GeoTiffError::MissingGeoreference(msg) => TerrainError::MissingGeoreference(msg),
            GeoTiffError::InvalidGeoreference(msg) => TerrainError::MissingGeoreference(msg),
            GeoTiffError::UnsupportedCrs(msg) => TerrainError::UnsupportedCrs(msg),
            GeoTiffError::Projection(e) => e,
        }
    }
}

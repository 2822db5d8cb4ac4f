//! Error types for the map-to-terrain pipeline.

use std::fmt;

use thiserror::Error;

/// Boxed underlying cause carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using TerrainError.
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Remote collaborators the orchestration layer talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteService {
    /// Hypsometric style-transfer image service
    StyleTransfer,
    /// Elevation / bounds / narration generative service
    Gemini,
}

impl fmt::Display for RemoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteService::StyleTransfer => write!(f, "style-transfer"),
            RemoteService::Gemini => write!(f, "gemini"),
        }
    }
}

/// Primary error type for decode, extract and normalize operations.
#[derive(Debug, Error)]
pub enum TerrainError {
    // === Input Errors ===
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Georeferencing unavailable: {0}")]
    GeoreferencingUnavailable(String),

    #[error("No georeferencing in raster: {0}")]
    MissingGeoreference(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    // === Processing Errors ===
    #[error("Image processing failed ({context}): {source}")]
    ImageProcessingFailure {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("Projection error: {0}")]
    Projection(String),

    // === Collaborator Errors ===
    #[error("Remote service '{service}' failed: {message}")]
    RemoteServiceFailure {
        service: RemoteService,
        message: String,
    },

    #[error("Remote service '{0}' is not configured")]
    RemoteServiceUnconfigured(RemoteService),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerrainError {
    /// Wrap a decode/resample/encode error with the step it happened in.
    pub fn image(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ImageProcessingFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Create a RemoteServiceFailure.
    pub fn remote(service: RemoteService, message: impl Into<String>) -> Self {
        Self::RemoteServiceFailure {
            service,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            TerrainError::UnsupportedFormat(_) => "UnsupportedFormat",
            TerrainError::GeoreferencingUnavailable(_) => "GeoreferencingUnavailable",
            TerrainError::MissingGeoreference(_) => "MissingGeoreference",
            TerrainError::UnsupportedCrs(_) => "UnsupportedCrs",
            TerrainError::InvalidBounds(_) => "InvalidBounds",
            TerrainError::ImageProcessingFailure { .. } => "ImageProcessingFailure",
            TerrainError::Projection(_) => "ProjectionError",
            TerrainError::RemoteServiceFailure { .. } => "RemoteServiceFailure",
            TerrainError::RemoteServiceUnconfigured(_) => "RemoteServiceUnconfigured",
            TerrainError::Config(_) => "ConfigError",
            TerrainError::Io(_) => "IoError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            TerrainError::UnsupportedFormat(_)
            | TerrainError::MissingGeoreference(_)
            | TerrainError::UnsupportedCrs(_)
            | TerrainError::InvalidBounds(_) => 400,

            TerrainError::ImageProcessingFailure { .. } | TerrainError::Projection(_) => 422,

            TerrainError::RemoteServiceFailure { .. } => 502,

            TerrainError::GeoreferencingUnavailable(_)
            | TerrainError::RemoteServiceUnconfigured(_) => 503,

            TerrainError::Config(_) | TerrainError::Io(_) => 500,
        }
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(err: serde_json::Error) -> Self {
        TerrainError::image("json", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_image_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = TerrainError::image("decode texture", io);
        assert_eq!(err.error_code(), "ImageProcessingFailure");
        assert!(err.to_string().contains("decode texture"));
        assert!(err.source().unwrap().to_string().contains("bad header"));
    }

    #[test]
    fn test_status_codes_distinguish_capability_from_data() {
        let unavailable = TerrainError::GeoreferencingUnavailable("feature disabled".into());
        let corrupt = TerrainError::image("open", "truncated");
        assert_eq!(unavailable.http_status_code(), 503);
        assert_eq!(corrupt.http_status_code(), 422);
        assert_ne!(unavailable.error_code(), corrupt.error_code());
    }

    #[test]
    fn test_remote_failure_names_service() {
        let err = TerrainError::remote(RemoteService::StyleTransfer, "HTTP 500");
        assert_eq!(
            err.to_string(),
            "Remote service 'style-transfer' failed: HTTP 500"
        );
        assert_eq!(err.http_status_code(), 502);
    }
}

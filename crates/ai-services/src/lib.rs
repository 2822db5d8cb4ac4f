//! Clients for the remote AI collaborators.
//!
//! - [`StyleTransferClient`]: hypsometric re-tinting of a map texture
//! - [`GeminiClient`]: heightmap generation, bounds extraction and flyover
//!   narration
//!
//! Both sit behind traits so the orchestration layer can swap in fakes.
//! Neither retries; failures carry the service name and message.

pub mod config;
pub mod gemini;
pub mod mime;
pub mod prompts;
pub mod style;

pub use config::AiServicesConfig;
pub use gemini::{parse_bounds, strip_code_fence, GeminiClient};
pub use mime::{mime_for_extension, mime_for_path};
pub use style::{StyleTransferClient, STYLE_MODEL};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use terrain_common::{GeoBounds, RemoteService, TerrainError, TerrainResult};

/// Viewer position for narration. Unknown fields are reported as such.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
}

/// Re-tints a map image.
#[async_trait]
pub trait Stylizer: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Submit a `data:` URI image and return the URL of the styled result.
    async fn stylize(&self, image_data_uri: &str) -> TerrainResult<String>;
}

/// Reads elevation and extent information from map images.
#[async_trait]
pub trait ElevationAssistant: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Encoded grayscale elevation image for a map.
    async fn generate_heightmap(&self, image: &[u8], mime: &str) -> TerrainResult<Vec<u8>>;

    /// Geographic bounds read off a map's graticule or labels.
    async fn extract_bounds(&self, image: &[u8], mime: &str) -> TerrainResult<GeoBounds>;

    /// One or two sentences about the current flyover view.
    async fn narrate(&self, location: &Location, features: &[String]) -> TerrainResult<String>;
}

pub(crate) fn build_client(config: &AiServicesConfig) -> TerrainResult<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| TerrainError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx response into a failure carrying the status and body.
pub(crate) async fn error_for_status(
    service: RemoteService,
    response: Response,
) -> TerrainResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let snippet: String = body.chars().take(300).collect();
    Err(TerrainError::remote(
        service,
        format!("HTTP {}: {}", status, snippet),
    ))
}

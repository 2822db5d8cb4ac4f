//! Style-transfer client (fal.ai image edit).

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use terrain_common::{RemoteService, TerrainError, TerrainResult};
use tracing::{debug, instrument};

use crate::config::AiServicesConfig;
use crate::{build_client, error_for_status, Stylizer};

/// Image-edit model used for hypsometric tinting.
pub const STYLE_MODEL: &str = "fal-ai/nano-banana-pro/edit";

const SERVICE: RemoteService = RemoteService::StyleTransfer;

#[derive(Debug, Deserialize)]
struct EditResponse {
    #[serde(default)]
    images: Vec<EditImage>,
}

#[derive(Debug, Deserialize)]
struct EditImage {
    url: String,
}

/// Client for the hypsometric style-transfer service.
pub struct StyleTransferClient {
    client: Client,
    endpoint: String,
    key: Option<String>,
}

impl StyleTransferClient {
    pub fn new(config: &AiServicesConfig) -> TerrainResult<Self> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.fal_endpoint.trim_end_matches('/').to_string(),
            key: config.fal_key.clone(),
        })
    }
}

#[async_trait]
impl Stylizer for StyleTransferClient {
    fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    #[instrument(skip(self, image_data_uri), fields(payload_bytes = image_data_uri.len()))]
    async fn stylize(&self, image_data_uri: &str) -> TerrainResult<String> {
        let key = self
            .key
            .as_deref()
            .ok_or(TerrainError::RemoteServiceUnconfigured(SERVICE))?;

        let body = json!({
            "prompt": crate::prompts::HYPSOMETRIC_TINT,
            "image_urls": [image_data_uri],
            "num_images": 1,
            "aspect_ratio": "auto",
            "output_format": "png",
            "resolution": "2K",
        });

        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, STYLE_MODEL))
            .header(header::AUTHORIZATION, format!("Key {}", key))
            .json(&body)
            .send()
            .await
            .map_err(|e| TerrainError::remote(SERVICE, e.to_string()))?;
        let response = error_for_status(SERVICE, response).await?;

        let parsed: EditResponse = response
            .json()
            .await
            .map_err(|e| TerrainError::remote(SERVICE, format!("malformed response: {}", e)))?;

        let url = parsed
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or_else(|| TerrainError::remote(SERVICE, "response contained no images"))?;

        debug!(url = %url, "Stylized texture");
        Ok(url)
    }
}

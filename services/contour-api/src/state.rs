//! Application state shared by every handler.

use std::sync::Arc;

use ai_services::{ElevationAssistant, GeminiClient, StyleTransferClient, Stylizer};
use anyhow::Result;
use geotiff_parser::RasterDecoder;
use metrics_exporter_prometheus::PrometheusHandle;
use terrain_processor::{HeightmapNormalizer, TextureExtractor};
use tracing::info;

use crate::config::ApiConfig;
use crate::uploads::UploadStore;

pub struct AppState {
    pub config: ApiConfig,

    /// GeoTIFF decoder; may lack a backend in minimal builds.
    pub decoder: RasterDecoder,

    pub extractor: TextureExtractor,

    pub normalizer: HeightmapNormalizer,

    pub stylizer: Arc<dyn Stylizer>,

    pub assistant: Arc<dyn ElevationAssistant>,

    pub uploads: UploadStore,

    /// Renders `/metrics`; `None` when no recorder was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state with the real remote clients.
    pub fn new(config: ApiConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let stylizer: Arc<dyn Stylizer> = Arc::new(StyleTransferClient::new(&config.ai)?);
        let assistant: Arc<dyn ElevationAssistant> = Arc::new(GeminiClient::new(&config.ai)?);

        let decoder = RasterDecoder::detect_with_limit(config.pipeline.max_decode_bytes);
        let state = Self::with_services(config, decoder, stylizer, assistant);
        info!(
            georeferencing = state.decoder.is_available(),
            gemini = state.assistant.is_configured(),
            style_transfer = state.stylizer.is_configured(),
            uploads_dir = %state.uploads.dir().display(),
            "Application state initialized"
        );
        Ok(Self { prometheus, ..state })
    }

    /// Build state around the given decoder and remote collaborators.
    pub fn with_services(
        config: ApiConfig,
        decoder: RasterDecoder,
        stylizer: Arc<dyn Stylizer>,
        assistant: Arc<dyn ElevationAssistant>,
    ) -> Self {
        Self {
            extractor: TextureExtractor::new(&config.pipeline),
            normalizer: HeightmapNormalizer::new(&config.pipeline),
            uploads: UploadStore::new(config.uploads_dir.clone()),
            decoder,
            stylizer,
            assistant,
            prometheus: None,
            config,
        }
    }
}

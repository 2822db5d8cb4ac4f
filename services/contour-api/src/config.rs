//! Service configuration.

use std::path::PathBuf;

use ai_services::AiServicesConfig;
use terrain_common::PipelineConfig;

/// Default ceiling on a single request body (uploads, multipart heightmaps).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Everything the service needs at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP listener binds to.
    pub listen: String,

    /// Directory uploaded files are stored in.
    pub uploads_dir: PathBuf,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,

    pub pipeline: PipelineConfig,

    pub ai: AiServicesConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            uploads_dir: PathBuf::from("./uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pipeline: PipelineConfig::default(),
            ai: AiServicesConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Pipeline and AI settings from the environment, listener settings from the caller.
    pub fn from_env(listen: String, uploads_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            listen,
            uploads_dir,
            max_upload_bytes,
            pipeline: PipelineConfig::from_env(),
            ai: AiServicesConfig::from_env(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be > 0".to_string());
        }
        self.pipeline.validate()
    }
}

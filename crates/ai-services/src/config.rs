//! Remote service configuration.

use std::time::Duration;

pub const DEFAULT_FAL_ENDPOINT: &str = "https://fal.run";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Credentials and endpoints for the remote collaborators.
///
/// A service with no key is left unconfigured; its client still builds
/// but every call fails with `RemoteServiceUnconfigured`.
#[derive(Clone)]
pub struct AiServicesConfig {
    /// fal.ai API key
    pub fal_key: Option<String>,
    /// fal.ai synchronous run endpoint
    pub fal_endpoint: String,
    /// Google generative language API key
    pub gemini_api_key: Option<String>,
    /// Generative language REST base URL
    pub gemini_endpoint: String,
    /// Model used for every Gemini call
    pub gemini_model: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for AiServicesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiServicesConfig")
            .field("fal_key", &self.fal_key.as_ref().map(|_| "<redacted>"))
            .field("fal_endpoint", &self.fal_endpoint)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_endpoint", &self.gemini_endpoint)
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for AiServicesConfig {
    fn default() -> Self {
        Self {
            fal_key: None,
            fal_endpoint: DEFAULT_FAL_ENDPOINT.to_string(),
            gemini_api_key: None,
            gemini_endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl AiServicesConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.fal_key = non_empty_var("FAL_KEY");
        config.gemini_api_key = non_empty_var("GEMINI_API_KEY");

        if let Some(endpoint) = non_empty_var("FAL_ENDPOINT") {
            config.fal_endpoint = endpoint;
        }

        if let Some(endpoint) = non_empty_var("GEMINI_ENDPOINT") {
            config.gemini_endpoint = endpoint;
        }

        if let Some(model) = non_empty_var("GEMINI_MODEL") {
            config.gemini_model = model;
        }

        if let Ok(val) = std::env::var("AI_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconfigured() {
        let config = AiServicesConfig::default();
        assert!(config.fal_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AiServicesConfig {
            fal_key: Some("secret-fal".to_string()),
            gemini_api_key: Some("secret-gemini".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}

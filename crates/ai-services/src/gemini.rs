//! Gemini `generateContent` client for heightmaps, bounds and narration.

use async_trait::async_trait;
use base64::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use terrain_common::{GeoBounds, RemoteService, TerrainError, TerrainResult};
use tracing::{debug, instrument};

use crate::config::AiServicesConfig;
use crate::{build_client, error_for_status, prompts, ElevationAssistant, Location};

const SERVICE: RemoteService = RemoteService::Gemini;
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .take(1)
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// All text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.parts().filter_map(|p| p.text.as_deref()).collect()
    }

    /// First inline image of the first candidate.
    fn image(&self) -> Option<&InlineData> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
    }
}

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    let body = body.trim_start();
    body.strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body)
        .trim()
}

/// Parse a bounds reply, tolerating a code fence around the JSON.
pub fn parse_bounds(text: &str) -> TerrainResult<GeoBounds> {
    let json = strip_code_fence(text);
    let bounds: GeoBounds = serde_json::from_str(json).map_err(|e| {
        TerrainError::remote(SERVICE, format!("bounds reply is not valid JSON ({}): {}", e, json))
    })?;
    bounds
        .validated()
        .map_err(|e| TerrainError::remote(SERVICE, format!("bounds reply rejected: {}", e)))
}

/// Client for the Gemini generative language API.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AiServicesConfig) -> TerrainResult<Self> {
        Ok(Self {
            client: build_client(config)?,
            endpoint: config.gemini_endpoint.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    async fn generate(&self, body: Value) -> TerrainResult<GenerateResponse> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(TerrainError::RemoteServiceUnconfigured(SERVICE))?;

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.endpoint, self.model))
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TerrainError::remote(SERVICE, e.to_string()))?;
        let response = error_for_status(SERVICE, response).await?;

        response
            .json()
            .await
            .map_err(|e| TerrainError::remote(SERVICE, format!("malformed response: {}", e)))
    }
}

fn image_part(image: &[u8], mime: &str) -> Value {
    json!({
        "inline_data": {
            "mime_type": mime,
            "data": BASE64_STANDARD.encode(image),
        }
    })
}

#[async_trait]
impl ElevationAssistant for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, image), fields(image_bytes = image.len(), model = %self.model))]
    async fn generate_heightmap(&self, image: &[u8], mime: &str) -> TerrainResult<Vec<u8>> {
        let body = json!({
            "contents": [{
                "parts": [image_part(image, mime), { "text": prompts::HEIGHTMAP }]
            }],
            "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] },
        });

        let response = self.generate(body).await?;
        let inline = response
            .image()
            .ok_or_else(|| TerrainError::remote(SERVICE, "no image in response"))?;
        let bytes = BASE64_STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| TerrainError::remote(SERVICE, format!("image payload is not base64: {}", e)))?;

        debug!(mime = %inline.mime_type, bytes = bytes.len(), "Received heightmap");
        Ok(bytes)
    }

    #[instrument(skip(self, image), fields(image_bytes = image.len(), model = %self.model))]
    async fn extract_bounds(&self, image: &[u8], mime: &str) -> TerrainResult<GeoBounds> {
        let body = json!({
            "contents": [{
                "parts": [image_part(image, mime), { "text": prompts::BOUNDS }]
            }],
        });

        let response = self.generate(body).await?;
        parse_bounds(&response.text())
    }

    #[instrument(skip(self, features), fields(model = %self.model))]
    async fn narrate(&self, location: &Location, features: &[String]) -> TerrainResult<String> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompts::narration(location, features) }]
            }],
        });

        let text = self.generate(body).await?.text();
        let text = text.trim();
        if text.is_empty() {
            return Err(TerrainError::remote(SERVICE, "empty narration"));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fence() {
        let text = "```json\n{\"north\": 1}\n```";
        assert_eq!(strip_code_fence(text), "{\"north\": 1}");
    }

    #[test]
    fn test_strip_bare_fence_without_close() {
        assert_eq!(strip_code_fence("```\n{}\n"), "{}");
    }

    #[test]
    fn test_parse_bounds_fenced() {
        let text = "```json\n{\"north\": 22.5, \"south\": 21.5, \"east\": -159.0, \"west\": -160.0}\n```";
        let bounds = parse_bounds(text).unwrap();
        assert_eq!(bounds, GeoBounds::new(22.5, 21.5, -159.0, -160.0));
    }

    #[test]
    fn test_parse_bounds_rejects_inverted() {
        let err = parse_bounds(r#"{"north": 1.0, "south": 2.0, "east": 1.0, "west": 0.0}"#).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::RemoteServiceFailure {
                service: RemoteService::Gemini,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_bounds_rejects_prose() {
        assert!(parse_bounds("I could not find any coordinates.").is_err());
    }

    #[test]
    fn test_response_accessors() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ]
                }
            }]
        }))
        .unwrap();
        assert_eq!(response.text(), "Here you go");
        assert_eq!(response.image().unwrap().data, "AQID");
    }
}

//! Tests for the remote clients against a local mock server.

use std::time::Duration;

use ai_services::{
    AiServicesConfig, ElevationAssistant, GeminiClient, Location, StyleTransferClient, Stylizer,
};
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use terrain_common::{GeoBounds, RemoteService, TerrainError};

/// Serve `app` on an ephemeral port and return its base URL.
async fn spawn_mock(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base: &str) -> AiServicesConfig {
    AiServicesConfig {
        fal_key: Some("fal-test-key".to_string()),
        fal_endpoint: base.to_string(),
        gemini_api_key: Some("gemini-test-key".to_string()),
        gemini_endpoint: base.to_string(),
        gemini_model: "gemini-test".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}

fn gemini_reply(parts: Value) -> Json<Value> {
    Json(json!({ "candidates": [{ "content": { "parts": parts } }] }))
}

// ============================================================================
// Style transfer
// ============================================================================

async fn fal_edit(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Key fal-test-key");
    let well_formed = body["num_images"] == 1
        && body["aspect_ratio"] == "auto"
        && body["output_format"] == "png"
        && body["resolution"] == "2K"
        && body["image_urls"][0]
            .as_str()
            .is_some_and(|u| u.starts_with("data:image/png;base64,"))
        && body["prompt"]
            .as_str()
            .is_some_and(|p| p.contains("hypsometric"));

    if authorized && well_formed {
        (
            StatusCode::OK,
            Json(json!({ "images": [{ "url": "https://cdn.example/styled.png" }] })),
        )
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": "bad request" })))
    }
}

#[tokio::test]
async fn test_stylize_returns_url() {
    let base = spawn_mock(Router::new().route("/fal-ai/nano-banana-pro/edit", post(fal_edit))).await;
    let client = StyleTransferClient::new(&config(&base)).unwrap();

    let url = client.stylize("data:image/png;base64,AQID").await.unwrap();
    assert_eq!(url, "https://cdn.example/styled.png");
}

#[tokio::test]
async fn test_stylize_http_error_is_remote_failure() {
    let app = Router::new().route(
        "/fal-ai/nano-banana-pro/edit",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded") }),
    );
    let base = spawn_mock(app).await;
    let client = StyleTransferClient::new(&config(&base)).unwrap();

    let err = client.stylize("data:image/png;base64,AQID").await.unwrap_err();
    match err {
        TerrainError::RemoteServiceFailure { service, message } => {
            assert_eq!(service, RemoteService::StyleTransfer);
            assert!(message.contains("500"));
            assert!(message.contains("model overloaded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_stylize_empty_images() {
    let app = Router::new().route(
        "/fal-ai/nano-banana-pro/edit",
        post(|| async { Json(json!({ "images": [] })) }),
    );
    let base = spawn_mock(app).await;
    let client = StyleTransferClient::new(&config(&base)).unwrap();

    let err = client.stylize("data:image/png;base64,AQID").await.unwrap_err();
    assert!(matches!(err, TerrainError::RemoteServiceFailure { .. }));
}

#[tokio::test]
async fn test_stylize_unconfigured() {
    let config = AiServicesConfig::default();
    let client = StyleTransferClient::new(&config).unwrap();
    assert!(!client.is_configured());

    let err = client.stylize("data:image/png;base64,AQID").await.unwrap_err();
    assert!(matches!(
        err,
        TerrainError::RemoteServiceUnconfigured(RemoteService::StyleTransfer)
    ));
}

// ============================================================================
// Gemini
// ============================================================================

async fn gemini_generate(
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if call != "gemini-test:generateContent"
        || headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("gemini-test-key")
    {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }

    let parts = &body["contents"][0]["parts"];
    let prompt = parts
        .as_array()
        .and_then(|p| p.iter().find_map(|part| part["text"].as_str()))
        .unwrap_or_default()
        .to_string();

    let reply = if prompt.contains("heightmap") {
        assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        gemini_reply(json!([
            { "text": "Here is the heightmap." },
            { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
        ]))
    } else if prompt.contains("bounding box") {
        gemini_reply(json!([{
            "text": "```json\n{\"north\": 22.5, \"south\": 21.5, \"east\": -159.0, \"west\": -160.0}\n```"
        }]))
    } else {
        gemini_reply(json!([{ "text": "  Below you, Waimea Canyon plunges a thousand meters.  " }]))
    };
    (StatusCode::OK, reply)
}

async fn gemini_base() -> String {
    spawn_mock(Router::new().route("/models/:call", post(gemini_generate))).await
}

#[tokio::test]
async fn test_generate_heightmap_decodes_inline_image() {
    let client = GeminiClient::new(&config(&gemini_base().await)).unwrap();

    let bytes = client.generate_heightmap(&[1, 2, 3], "image/png").await.unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[tokio::test]
async fn test_generate_heightmap_without_image_fails() {
    let app = Router::new().route(
        "/models/:call",
        post(|| async { gemini_reply(json!([{ "text": "I cannot do that." }])) }),
    );
    let client = GeminiClient::new(&config(&spawn_mock(app).await)).unwrap();

    let err = client.generate_heightmap(&[1, 2, 3], "image/png").await.unwrap_err();
    match err {
        TerrainError::RemoteServiceFailure { service, message } => {
            assert_eq!(service, RemoteService::Gemini);
            assert!(message.contains("no image"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_extract_bounds_strips_fence() {
    let client = GeminiClient::new(&config(&gemini_base().await)).unwrap();

    let bounds = client.extract_bounds(&[1, 2, 3], "image/jpeg").await.unwrap();
    assert_eq!(bounds, GeoBounds::new(22.5, 21.5, -159.0, -160.0));
}

#[tokio::test]
async fn test_narrate_trims_text() {
    let client = GeminiClient::new(&config(&gemini_base().await)).unwrap();
    let location = Location {
        lat: Some(22.07),
        lon: Some(-159.66),
        elevation: Some(1100.0),
    };

    let text = client
        .narrate(&location, &["Waimea Canyon".to_string()])
        .await
        .unwrap();
    assert_eq!(text, "Below you, Waimea Canyon plunges a thousand meters.");
}

#[tokio::test]
async fn test_wrong_key_is_remote_failure() {
    let base = gemini_base().await;
    let config = AiServicesConfig {
        gemini_api_key: Some("wrong".to_string()),
        ..config(&base)
    };
    let client = GeminiClient::new(&config).unwrap();

    let err = client.narrate(&Location::default(), &[]).await.unwrap_err();
    assert!(matches!(err, TerrainError::RemoteServiceFailure { .. }));
}

#[tokio::test]
async fn test_gemini_unconfigured() {
    let client = GeminiClient::new(&AiServicesConfig::default()).unwrap();
    assert!(!client.is_configured());

    let err = client.extract_bounds(&[0], "image/png").await.unwrap_err();
    assert!(matches!(
        err,
        TerrainError::RemoteServiceUnconfigured(RemoteService::Gemini)
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let config = AiServicesConfig {
        request_timeout: Duration::from_secs(2),
        ..config("http://127.0.0.1:1")
    };
    let client = GeminiClient::new(&config).unwrap();

    let err = client.narrate(&Location::default(), &[]).await.unwrap_err();
    assert!(matches!(err, TerrainError::RemoteServiceFailure { .. }));
}

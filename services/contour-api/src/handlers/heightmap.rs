//! Heightmap endpoints.
//!
//! `POST /api/generate-heightmap` asks the elevation assistant for a
//! grayscale image of an uploaded map; `POST /api/heightmap` takes one
//! directly. Both end in the same normalizer.

use std::sync::Arc;
use std::time::Instant;

use ai_services::mime_for_path;
use axum::extract::{Extension, Multipart, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use terrain_common::{RemoteService, TerrainError};
use tracing::info;

use super::{read_file_part, resolve_upload, FileQuery};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HeightmapResponse {
    pub success: bool,
    pub heightmap_b64: String,
    pub size: u32,
}

pub async fn generate_heightmap_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<HeightmapResponse>> {
    let path = resolve_upload(&state, &query.file_id)?;
    let bytes = tokio::fs::read(&path).await.map_err(TerrainError::from)?;
    let mime = mime_for_path(&path);

    let elevation = metrics::record_remote(
        RemoteService::Gemini,
        state.assistant.generate_heightmap(&bytes, mime).await,
    )
    .inspect_err(|_| metrics::record_failure("generate_heightmap"))?;

    info!(
        file_id = %query.file_id,
        bytes = elevation.len(),
        "Received generated heightmap"
    );
    normalize(state, elevation).await
}

pub async fn heightmap_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<HeightmapResponse>> {
    let part = read_file_part(multipart).await?;
    info!(
        filename = %part.filename,
        bytes = part.bytes.len(),
        "Received heightmap upload"
    );
    normalize(state, part.bytes).await
}

async fn normalize(state: Arc<AppState>, bytes: Vec<u8>) -> ApiResult<Json<HeightmapResponse>> {
    let worker = Arc::clone(&state);
    let heightmap_b64 = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let field = worker.normalizer.normalize_bytes(&bytes)?;
        metrics::record_heightmap_normalize(start.elapsed());
        field.to_base64()
    })
    .await?
    .inspect_err(|_| metrics::record_failure("normalize_heightmap"))?;

    Ok(Json(HeightmapResponse {
        success: true,
        heightmap_b64,
        size: state.normalizer.side(),
    }))
}

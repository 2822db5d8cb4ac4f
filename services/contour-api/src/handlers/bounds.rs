//! POST /api/extract-bounds

use std::sync::Arc;

use ai_services::mime_for_path;
use axum::extract::{Extension, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use terrain_common::{GeoBounds, RemoteService, TerrainError};
use tracing::info;

use super::{resolve_upload, FileQuery};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct BoundsResponse {
    pub success: bool,
    pub bounds: GeoBounds,
}

/// Read the geographic extent of an uploaded map with the elevation assistant.
pub async fn extract_bounds_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<BoundsResponse>> {
    let path = resolve_upload(&state, &query.file_id)?;
    let bytes = tokio::fs::read(&path).await.map_err(TerrainError::from)?;
    let mime = mime_for_path(&path);

    let bounds = metrics::record_remote(
        RemoteService::Gemini,
        state.assistant.extract_bounds(&bytes, mime).await,
    )
    .inspect_err(|_| metrics::record_failure("extract_bounds"))?;

    info!(
        file_id = %query.file_id,
        north = bounds.north,
        south = bounds.south,
        east = bounds.east,
        west = bounds.west,
        "Extracted bounds"
    );
    Ok(Json(BoundsResponse {
        success: true,
        bounds,
    }))
}

//! POST /api/stylize

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use terrain_common::RemoteService;
use tracing::info;

use super::{resolve_upload, FileQuery};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// Longest side of the image sent for style transfer.
pub const STYLE_UPLOAD_CEILING: u32 = 2048;

#[derive(Debug, Serialize, Deserialize)]
pub struct StylizeResponse {
    pub success: bool,
    pub url: String,
}

/// Re-tint an uploaded map with hypsometric colors.
pub async fn stylize_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<StylizeResponse>> {
    let path = resolve_upload(&state, &query.file_id)?;

    let worker = Arc::clone(&state);
    let data_uri = tokio::task::spawn_blocking(move || {
        worker
            .extractor
            .prepare_for_upload(&path, STYLE_UPLOAD_CEILING)
    })
    .await?
    .inspect_err(|_| metrics::record_failure("stylize"))?;

    let url = metrics::record_remote(
        RemoteService::StyleTransfer,
        state.stylizer.stylize(&data_uri).await,
    )
    .inspect_err(|_| metrics::record_failure("stylize"))?;

    info!(file_id = %query.file_id, url = %url, "Stylized map");
    Ok(Json(StylizeResponse { success: true, url }))
}

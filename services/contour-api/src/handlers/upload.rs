//! POST /api/upload

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Extension, Multipart};
use axum::Json;
use serde::{Deserialize, Serialize};
use terrain_common::TerrainResult;
use terrain_processor::TextureOutput;
use tracing::{info, warn};

use super::read_file_part;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use crate::uploads::{kind_for_extension, validate_extension, UploadKind};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: String,
    #[serde(flatten)]
    pub texture: TextureOutput,
    pub has_bounds: bool,
}

/// Store an uploaded map and return its texture (and bounds when georeferenced).
pub async fn upload_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let part = read_file_part(multipart).await?;
    let ext = validate_extension(&part.filename)?;
    let kind = kind_for_extension(&ext);

    let (file_id, path) = state.uploads.save(&ext, &part.bytes).await?;
    metrics::record_upload(kind.as_str());

    let worker = Arc::clone(&state);
    let stored = path.clone();
    let task = tokio::task::spawn_blocking(move || process_upload(&worker, kind, &stored));
    let processed = match task.await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(ApiError::from(e)),
    };
    let texture = match processed {
        Ok(texture) => texture,
        Err(e) => {
            metrics::record_failure("upload");
            discard_upload(&path).await;
            return Err(e);
        }
    };

    info!(
        file_id = %file_id,
        kind = kind.as_str(),
        width = texture.width,
        height = texture.height,
        has_bounds = texture.bounds.is_some(),
        "Upload processed"
    );

    Ok(Json(UploadResponse {
        success: true,
        file_id,
        has_bounds: texture.bounds.is_some(),
        texture,
    }))
}

/// Remove an upload whose processing failed; its id is never returned.
async fn discard_upload(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove rejected upload");
    }
}

fn process_upload(state: &AppState, kind: UploadKind, path: &Path) -> TerrainResult<TextureOutput> {
    let start = Instant::now();
    let output = match kind {
        UploadKind::GeoTiff => {
            let dataset = state.decoder.open(path)?;
            let bounds = match dataset.georeference() {
                Some(_) => Some(state.decoder.geographic_bounds(&dataset)?),
                None => {
                    warn!(path = %path.display(), "TIFF has no georeferencing, continuing without bounds");
                    None
                }
            };
            state.extractor.extract_from_raster(&dataset)?.into_output(bounds)
        }
        UploadKind::Image => state.extractor.extract_from_image(path)?.into_output(None),
    };
    metrics::record_texture_extract(start.elapsed());
    Ok(output)
}

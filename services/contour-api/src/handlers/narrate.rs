//! POST /api/narrate

use std::sync::Arc;

use ai_services::Location;
use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use terrain_common::RemoteService;

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct NarrateRequest {
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NarrateResponse {
    pub success: bool,
    pub narration: String,
}

pub async fn narrate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<NarrateRequest>,
) -> ApiResult<Json<NarrateResponse>> {
    let narration = metrics::record_remote(
        RemoteService::Gemini,
        state
            .assistant
            .narrate(&request.location, &request.features)
            .await,
    )
    .inspect_err(|_| metrics::record_failure("narrate"))?;

    Ok(Json(NarrateResponse {
        success: true,
        narration,
    }))
}

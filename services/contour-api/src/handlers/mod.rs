//! HTTP request handlers.

pub mod bounds;
pub mod health;
pub mod heightmap;
pub mod narrate;
pub mod stylize;
pub mod upload;

use std::path::PathBuf;

use axum::extract::Multipart;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `?file_id=` on endpoints that work on a previous upload.
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file_id: String,
}

/// A file received in a multipart form.
pub(crate) struct FilePart {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body.
pub(crate) async fn read_file_part(mut multipart: Multipart) -> ApiResult<FilePart> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?.to_vec();
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
        }
        return Ok(FilePart { filename, bytes });
    }
    Err(ApiError::BadRequest("missing 'file' field".to_string()))
}

/// Path of a stored upload, or 404.
pub(crate) fn resolve_upload(state: &AppState, file_id: &str) -> ApiResult<PathBuf> {
    state
        .uploads
        .find(file_id)
        .ok_or_else(|| ApiError::NotFound(file_id.to_string()))
}

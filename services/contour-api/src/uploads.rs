//! Upload storage: files are saved as `<id><ext>` in one flat directory.

use std::path::{Path, PathBuf};

use terrain_common::{TerrainError, TerrainResult};
use tracing::info;
use uuid::Uuid;

/// Extensions accepted for upload, lowercase with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".tif", ".tiff", ".jpg", ".jpeg", ".png", ".webp"];

const ID_LEN: usize = 8;

/// How an upload is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Possibly georeferenced raster, read through the raster decoder
    GeoTiff,
    /// Plain image with no geographic information
    Image,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::GeoTiff => "geotiff",
            UploadKind::Image => "image",
        }
    }
}

/// Lowercased extension of a client file name, checked against the allow list.
pub fn validate_extension(filename: &str) -> TerrainResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(TerrainError::UnsupportedFormat(format!(
            "file type '{}' not allowed; use one of {}",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}

pub fn kind_for_extension(ext: &str) -> UploadKind {
    match ext {
        ".tif" | ".tiff" => UploadKind::GeoTiff,
        _ => UploadKind::Image,
    }
}

/// Short random identifier for a new upload.
pub fn new_file_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

fn is_valid_id(file_id: &str) -> bool {
    file_id.len() == ID_LEN && file_id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Flat directory of uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh id and return `(file_id, path)`.
    pub async fn save(&self, ext: &str, bytes: &[u8]) -> TerrainResult<(String, PathBuf)> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_id = new_file_id();
        let path = self.dir.join(format!("{}{}", file_id, ext));
        tokio::fs::write(&path, bytes).await?;

        info!(
            file_id = %file_id,
            path = %path.display(),
            bytes = bytes.len(),
            "Saved upload"
        );
        Ok((file_id, path))
    }

    /// Path of a previous upload, if one exists with that id.
    pub fn find(&self, file_id: &str) -> Option<PathBuf> {
        if !is_valid_id(file_id) {
            return None;
        }
        ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}{}", file_id, ext)))
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_extension() {
        assert_eq!(validate_extension("Kauai.TIF").unwrap(), ".tif");
        assert_eq!(validate_extension("map.webp").unwrap(), ".webp");
        assert!(matches!(
            validate_extension("map.gif"),
            Err(TerrainError::UnsupportedFormat(_))
        ));
        assert!(validate_extension("no_extension").is_err());
    }

    #[test]
    fn test_kind_for_extension() {
        assert_eq!(kind_for_extension(".tiff"), UploadKind::GeoTiff);
        assert_eq!(kind_for_extension(".jpeg"), UploadKind::Image);
    }

    #[test]
    fn test_new_file_id_shape() {
        let id = new_file_id();
        assert_eq!(id.len(), 8);
        assert!(is_valid_id(&id));
    }

    #[test]
    fn test_find_rejects_traversal() {
        let store = UploadStore::new("/tmp");
        assert!(store.find("../etc/p").is_none());
        assert!(store.find("short").is_none());
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let (id, path) = store.save(".png", b"not really a png").await.unwrap();
        assert!(path.ends_with(format!("{}.png", id)));
        assert_eq!(store.find(&id), Some(path));
        assert!(store.find("00000000").is_none());
    }
}

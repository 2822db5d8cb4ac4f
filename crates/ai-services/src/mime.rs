//! MIME types for uploaded images.

use std::path::Path;

/// MIME type for a file extension (with or without the dot).
/// Unknown extensions are sent as JPEG.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/jpeg",
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map(mime_for_extension)
        .unwrap_or("image/jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_for_extension(".JPG"), "image/jpeg");
        assert_eq!(mime_for_extension("png"), "image/png");
        assert_eq!(mime_for_extension(".webp"), "image/webp");
        assert_eq!(mime_for_extension(".tiff"), "image/tiff");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(mime_for_extension(".bmp"), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("uploads/abc123")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("uploads/abc123.tif")), "image/tiff");
    }
}

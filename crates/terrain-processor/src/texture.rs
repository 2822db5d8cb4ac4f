//! Texture extraction: bounded, JPEG-encoded color textures.

use std::path::Path;
use std::time::Instant;

use base64::prelude::*;
use geotiff_parser::RasterDataset;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use terrain_common::{GeoBounds, PipelineConfig, TerrainResult};
use tracing::debug;

use crate::encode::{data_uri, decode_file, encode_jpeg, encode_png_rgb, filter_type};

/// Quality used for JPEG payloads sent to remote services.
const UPLOAD_JPEG_QUALITY: u8 = 85;

/// Scale `(width, height)` so the longer side is at most `max_dim`.
///
/// Never upscales. The shorter side is rounded and every side is at least 1.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= max_dim {
        return (width, height);
    }

    let scale = max_dim as f64 / long as f64;
    let short = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dim);
    if width >= height {
        (max_dim, short(height))
    } else {
        (short(width), max_dim)
    }
}

/// An encoded texture and the size of the image it came from.
#[derive(Debug, Clone)]
pub struct Texture {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl Texture {
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.jpeg)
    }

    /// Transfer form, with bounds when the source was georeferenced.
    pub fn into_output(self, bounds: Option<GeoBounds>) -> TextureOutput {
        TextureOutput {
            bounds,
            texture_b64: self.to_base64(),
            width: self.width,
            height: self.height,
            original_width: self.original_width,
            original_height: self.original_height,
        }
    }
}

/// Serialized texture result. Absent `bounds` marks a plain image source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureOutput {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bounds: Option<GeoBounds>,
    pub texture_b64: String,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

/// Produces textures with one resize and encode policy for every source.
#[derive(Debug, Clone)]
pub struct TextureExtractor {
    max_dim: u32,
    quality: u8,
    filter: FilterType,
}

impl TextureExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            max_dim: config.max_texture_dim,
            quality: config.texture_quality,
            filter: filter_type(config.resample_filter),
        }
    }

    /// Texture from a decoded georeferenced raster.
    pub fn extract_from_raster(&self, dataset: &RasterDataset) -> TerrainResult<Texture> {
        self.extract(dataset.to_rgb_image())
    }

    /// Texture from a plain image file (JPEG, PNG, WebP, TIFF).
    pub fn extract_from_image(&self, path: &Path) -> TerrainResult<Texture> {
        let img = decode_file(path)?;
        self.extract_from_dynamic(&img)
    }

    /// Texture from an already decoded image of any color type.
    pub fn extract_from_dynamic(&self, img: &DynamicImage) -> TerrainResult<Texture> {
        self.extract(img.to_rgb8())
    }

    fn extract(&self, rgb: RgbImage) -> TerrainResult<Texture> {
        let start = Instant::now();
        let (original_width, original_height) = rgb.dimensions();
        let resized = self.shrink(rgb);
        let (width, height) = resized.dimensions();
        let jpeg = encode_jpeg(&resized, self.quality)?;

        debug!(
            original_width,
            original_height,
            width,
            height,
            bytes = jpeg.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Extracted texture"
        );

        Ok(Texture {
            jpeg,
            width,
            height,
            original_width,
            original_height,
        })
    }

    fn shrink(&self, rgb: RgbImage) -> RgbImage {
        self.shrink_to(rgb, self.max_dim)
    }

    fn shrink_to(&self, rgb: RgbImage, max_dim: u32) -> RgbImage {
        let (w, h) = rgb.dimensions();
        let (new_w, new_h) = fit_within(w, h, max_dim);
        if (new_w, new_h) == (w, h) {
            rgb
        } else {
            imageops::resize(&rgb, new_w, new_h, self.filter)
        }
    }

    /// Shrink an image file under `ceiling` and embed it as a `data:` URI.
    ///
    /// TIFF and PNG sources become PNG; everything else becomes JPEG.
    pub fn prepare_for_upload(&self, path: &Path, ceiling: u32) -> TerrainResult<String> {
        let img = decode_file(path)?;
        let rgb = self.shrink_to(img.to_rgb8(), ceiling);

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let (mime, bytes) = match extension.as_str() {
            "tif" | "tiff" | "png" => ("image/png", encode_png_rgb(&rgb)?),
            _ => ("image/jpeg", encode_jpeg(&rgb, UPLOAD_JPEG_QUALITY)?),
        };

        debug!(
            path = %path.display(),
            mime,
            width = rgb.width(),
            height = rgb.height(),
            bytes = bytes.len(),
            "Prepared image for upload"
        );
        Ok(data_uri(mime, &bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_no_upscale() {
        assert_eq!(fit_within(100, 50, 2048), (100, 50));
        assert_eq!(fit_within(2048, 2048, 2048), (2048, 2048));
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(4000, 3000, 2048), (2048, 1536));
    }

    #[test]
    fn test_fit_within_portrait_rounds() {
        // 3001 * 2048 / 5000 = 1229.2096
        assert_eq!(fit_within(3001, 5000, 2048), (1229, 2048));
        // 1001 * 2048 / 3000 = 683.349
        assert_eq!(fit_within(3000, 1001, 2048), (2048, 683));
    }

    #[test]
    fn test_fit_within_clamps_degenerate() {
        assert_eq!(fit_within(100_000, 1, 2048), (2048, 1));
    }

    #[test]
    fn test_output_omits_missing_bounds() {
        let texture = Texture {
            jpeg: vec![1, 2, 3],
            width: 1,
            height: 1,
            original_width: 1,
            original_height: 1,
        };
        let output = texture.into_output(None);
        assert_eq!(output.texture_b64, "AQID");
        assert!(output.bounds.is_none());
    }
}

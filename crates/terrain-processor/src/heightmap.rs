//! Heightmap normalization: grayscale, smooth, pad to square, resample.

use std::path::Path;
use std::time::Instant;

use base64::prelude::*;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use terrain_common::{PipelineConfig, TerrainResult};
use tracing::debug;

use crate::encode::{decode_bytes, decode_file, encode_png_gray, filter_type};

/// A square single-channel displacement field.
#[derive(Debug, Clone)]
pub struct HeightField {
    image: GrayImage,
}

impl HeightField {
    pub fn side(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Lossless PNG encoding of the field.
    pub fn png_bytes(&self) -> TerrainResult<Vec<u8>> {
        encode_png_gray(&self.image)
    }

    /// Base64 of [`HeightField::png_bytes`].
    pub fn to_base64(&self) -> TerrainResult<String> {
        Ok(BASE64_STANDARD.encode(self.png_bytes()?))
    }
}

/// Center `img` on a zero-filled square canvas of side `max(w, h)`.
///
/// Offsets are floored, so an odd remainder leaves the extra row or column
/// on the bottom or right.
pub fn pad_to_square(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let side = w.max(h);
    if w == h {
        return img.clone();
    }

    let mut canvas = GrayImage::from_pixel(side, side, Luma([0]));
    let x = ((side - w) / 2) as i64;
    let y = ((side - h) / 2) as i64;
    imageops::replace(&mut canvas, img, x, y);
    canvas
}

/// Converts arbitrary elevation images into fixed-size square fields.
#[derive(Debug, Clone)]
pub struct HeightmapNormalizer {
    side: u32,
    blur_sigma: f32,
    filter: FilterType,
}

impl HeightmapNormalizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            side: config.heightmap_side,
            blur_sigma: config.heightmap_blur_sigma,
            filter: filter_type(config.resample_filter),
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    /// Normalize an image file.
    pub fn normalize_file(&self, path: &Path) -> TerrainResult<HeightField> {
        let img = decode_file(path)?;
        self.normalize(&img)
    }

    /// Normalize encoded image bytes, e.g. a remote service payload.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> TerrainResult<HeightField> {
        let img = decode_bytes(bytes)?;
        self.normalize(&img)
    }

    /// Normalize a decoded image.
    pub fn normalize(&self, img: &DynamicImage) -> TerrainResult<HeightField> {
        let start = Instant::now();
        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();

        let smoothed = if self.blur_sigma > 0.0 {
            imageops::blur(&gray, self.blur_sigma)
        } else {
            gray
        };
        let square = pad_to_square(&smoothed);
        let image = imageops::resize(&square, self.side, self.side, self.filter);

        debug!(
            width,
            height,
            padded = square.width(),
            side = self.side,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Normalized heightmap"
        );
        Ok(HeightField { image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_portrait_centers_horizontally() {
        let img = GrayImage::from_pixel(300, 900, Luma([200]));
        let square = pad_to_square(&img);
        assert_eq!(square.dimensions(), (900, 900));
        assert_eq!(square.get_pixel(299, 450).0, [0]);
        assert_eq!(square.get_pixel(300, 450).0, [200]);
        assert_eq!(square.get_pixel(599, 0).0, [200]);
        assert_eq!(square.get_pixel(600, 899).0, [0]);
    }

    #[test]
    fn test_pad_odd_remainder_floors() {
        let img = GrayImage::from_pixel(4, 1, Luma([9]));
        let square = pad_to_square(&img);
        assert_eq!(square.dimensions(), (4, 4));
        // (4 - 1) / 2 = 1
        assert_eq!(square.get_pixel(0, 0).0, [0]);
        assert_eq!(square.get_pixel(0, 1).0, [9]);
        assert_eq!(square.get_pixel(0, 2).0, [0]);
    }

    #[test]
    fn test_square_input_untouched() {
        let img = GrayImage::from_fn(3, 3, |x, y| Luma([(x + y) as u8]));
        assert_eq!(pad_to_square(&img), img);
    }

    #[test]
    fn test_zero_sigma_skips_blur() {
        let config = PipelineConfig {
            heightmap_side: 4,
            heightmap_blur_sigma: 0.0,
            resample_filter: terrain_common::ResampleFilter::Nearest,
            ..Default::default()
        };
        let normalizer = HeightmapNormalizer::new(&config);
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([77])));
        let field = normalizer.normalize(&img).unwrap();
        assert!(field.image().pixels().all(|p| p.0 == [77]));
    }
}

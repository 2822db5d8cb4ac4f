//! Tests for heightmap normalization.

use base64::prelude::*;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, Rgb, RgbImage};
use terrain_common::{PipelineConfig, TerrainError};
use terrain_processor::HeightmapNormalizer;
use test_utils::{constant_gray, gray_ramp, jpeg_bytes, png_bytes, scratch_dir, write_bytes};

fn normalizer() -> HeightmapNormalizer {
    HeightmapNormalizer::new(&PipelineConfig::default())
}

// ============================================================================
// Shape
// ============================================================================

#[test]
fn test_portrait_is_padded_and_resized() {
    let img = DynamicImage::ImageLuma8(constant_gray(300, 900, 200));
    let field = normalizer().normalize(&img).unwrap();
    assert_eq!(field.image().dimensions(), (512, 512));

    // Content sits in the middle third; the padding is 0
    let out = field.image();
    assert_eq!(out.get_pixel(20, 256).0, [0]);
    assert_eq!(out.get_pixel(491, 256).0, [0]);
    assert!(out.get_pixel(256, 256).0[0].abs_diff(200) <= 2);
}

#[test]
fn test_always_square_at_target() {
    for (w, h) in [(1, 1), (2000, 10), (10, 2000), (512, 512), (1023, 77)] {
        let img = DynamicImage::ImageLuma8(constant_gray(w, h, 128));
        let field = normalizer().normalize(&img).unwrap();
        assert_eq!(field.side(), 512, "input {}x{}", w, h);
        assert_eq!(field.image().dimensions(), (512, 512));
    }
}

#[test]
fn test_configured_side() {
    let config = PipelineConfig {
        heightmap_side: 128,
        ..Default::default()
    };
    let img = DynamicImage::ImageLuma8(gray_ramp(640, 480));
    let field = HeightmapNormalizer::new(&config).normalize(&img).unwrap();
    assert_eq!(field.image().dimensions(), (128, 128));
}

// ============================================================================
// Content
// ============================================================================

#[test]
fn test_square_input_is_not_cropped() {
    let img = DynamicImage::ImageLuma8(gray_ramp(256, 256));
    let field = normalizer().normalize(&img).unwrap();
    let out = field.image();

    // Ramp survives end to end: dark west edge, bright east edge
    assert!(out.get_pixel(4, 256).0[0] < 16);
    assert!(out.get_pixel(507, 256).0[0] > 239);
    assert!(out.get_pixel(128, 256).0[0] < out.get_pixel(384, 256).0[0]);
}

#[test]
fn test_color_input_becomes_grayscale() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([255, 255, 255])));
    let field = normalizer().normalize(&img).unwrap();
    assert!(field.image().get_pixel(256, 256).0[0] > 250);
}

#[test]
fn test_blur_smooths_single_spike() {
    let mut gray = GrayImage::from_pixel(512, 512, Luma([0]));
    gray.put_pixel(256, 256, Luma([255]));
    let field = normalizer().normalize(&DynamicImage::ImageLuma8(gray)).unwrap();

    let peak = field.image().get_pixel(256, 256).0[0];
    assert!(peak < 255, "spike should be spread by the blur, got {}", peak);
    assert!(field.image().get_pixel(257, 256).0[0] > 0);
}

// ============================================================================
// Inputs and encoding
// ============================================================================

#[test]
fn test_normalize_bytes_from_service_payload() {
    let bytes = jpeg_bytes(&DynamicImage::ImageLuma8(gray_ramp(400, 200)));
    let field = normalizer().normalize_bytes(&bytes).unwrap();
    assert_eq!(field.side(), 512);
}

#[test]
fn test_normalize_file() {
    let dir = scratch_dir();
    let path = write_bytes(
        &dir,
        "dem.png",
        &png_bytes(&DynamicImage::ImageLuma8(gray_ramp(300, 900))),
    );
    let field = normalizer().normalize_file(&path).unwrap();
    assert_eq!(field.side(), 512);
}

#[test]
fn test_base64_is_grayscale_png() {
    let img = DynamicImage::ImageLuma8(gray_ramp(64, 32));
    let field = normalizer().normalize(&img).unwrap();

    let png = BASE64_STANDARD.decode(field.to_base64().unwrap()).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
    assert_eq!(decoded.dimensions(), (512, 512));
    assert_eq!(decoded.to_luma8(), *field.image());
}

#[test]
fn test_garbage_bytes_fail() {
    let err = normalizer().normalize_bytes(&[0u8; 32]).unwrap_err();
    assert!(matches!(
        err,
        TerrainError::UnsupportedFormat(_) | TerrainError::ImageProcessingFailure { .. }
    ));
}

//! Image decode/encode helpers shared by the texture and heightmap paths.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use base64::prelude::*;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GrayImage, ImageEncoder, ImageError, RgbImage};
use terrain_common::{ResampleFilter, TerrainError, TerrainResult};

/// Map the configured filter onto the image crate's filter.
pub fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

fn image_error(context: &str, err: ImageError) -> TerrainError {
    match err {
        ImageError::Unsupported(e) => {
            TerrainError::UnsupportedFormat(format!("{}: {}", context, e))
        }
        other => TerrainError::image(context, other),
    }
}

/// Decode an image file. The format comes from the content, never the extension.
pub fn decode_file(path: &Path) -> TerrainResult<DynamicImage> {
    let file = BufReader::new(File::open(path)?);
    let reader = image::io::Reader::new(file)
        .with_guessed_format()
        .map_err(|e| TerrainError::image("read image header", e))?;
    if reader.format().is_none() {
        return Err(TerrainError::UnsupportedFormat(format!(
            "unrecognised image content in {}",
            path.display()
        )));
    }
    reader.decode().map_err(|e| image_error("decode image", e))
}

/// Decode an in-memory image.
pub fn decode_bytes(bytes: &[u8]) -> TerrainResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| image_error("decode image bytes", e))
}

/// Encode RGB pixels as JPEG at the given quality.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> TerrainResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut jpeg_data = Vec::new();
    let mut cursor = Cursor::new(&mut jpeg_data);

    let mut encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
    encoder
        .encode(img, width, height, ColorType::Rgb8)
        .map_err(|e| TerrainError::image("encode JPEG", e))?;

    Ok(jpeg_data)
}

/// Encode a grayscale image as lossless PNG.
pub fn encode_png_gray(img: &GrayImage) -> TerrainResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data)
        .write_image(img, width, height, ColorType::L8)
        .map_err(|e| TerrainError::image("encode PNG", e))?;
    Ok(png_data)
}

/// Encode RGB pixels as lossless PNG.
pub fn encode_png_rgb(img: &RgbImage) -> TerrainResult<Vec<u8>> {
    let (width, height) = img.dimensions();
    let mut png_data = Vec::new();
    PngEncoder::new(&mut png_data)
        .write_image(img, width, height, ColorType::Rgb8)
        .map_err(|e| TerrainError::image("encode PNG", e))?;
    Ok(png_data)
}

/// Embed bytes in a `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}

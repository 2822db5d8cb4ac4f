//! Synthetic map and elevation images.
//!
//! Patterns are deterministic so tests can check which source pixels ended
//! up where after resizing and padding.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma, Rgb, RgbImage};

/// Interleaved RGB bytes: red ramps left to right, green top to bottom,
/// blue is constant.
pub fn rgb_gradient_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(ramp(x, width));
            data.push(ramp(y, height));
            data.push(96);
        }
    }
    data
}

/// The same gradient as [`rgb_gradient_pixels`] as an image.
pub fn rgb_gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([ramp(x, width), ramp(y, height), 96]))
}

/// Grayscale ramp, dark in the west, bright in the east.
pub fn gray_ramp(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| Luma([ramp(x, width)]))
}

/// Uniform grayscale image.
pub fn constant_gray(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// 16-bit elevation-like samples spanning `min..=max` left to right.
pub fn elevation_u16(width: u32, height: u32, min: u16, max: u16) -> Vec<u16> {
    let span = (max - min) as f64;
    let mut data = Vec::with_capacity((width * height) as usize);
    for _ in 0..height {
        for x in 0..width {
            let t = if width > 1 {
                x as f64 / (width - 1) as f64
            } else {
                0.0
            };
            data.push(min + (t * span).round() as u16);
        }
    }
    data
}

/// Encode an image as PNG bytes.
pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageOutputFormat::Png)
        .expect("Failed to encode PNG fixture");
    buf.into_inner()
}

/// Encode an image as JPEG bytes.
pub fn jpeg_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_to(&mut buf, ImageOutputFormat::Jpeg(90))
        .expect("Failed to encode JPEG fixture");
    buf.into_inner()
}

fn ramp(pos: u32, len: u32) -> u8 {
    if len <= 1 {
        return 0;
    }
    ((pos as f64 / (len - 1) as f64) * 255.0).round() as u8
}

//! Texture and heightmap production for the contour pipeline.
//!
//! - [`TextureExtractor`] turns a decoded raster or a plain image into a
//!   JPEG texture whose longer side is capped.
//! - [`HeightmapNormalizer`] turns any grayscale elevation image into a
//!   square, smoothed, fixed-size PNG displacement field.
//!
//! Both are stateless after construction and safe to share across threads.

pub mod encode;
pub mod heightmap;
pub mod texture;

pub use heightmap::{pad_to_square, HeightField, HeightmapNormalizer};
pub use texture::{fit_within, Texture, TextureExtractor, TextureOutput};

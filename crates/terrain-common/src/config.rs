//! Configuration for the texture and heightmap pipeline.

use serde::{Deserialize, Serialize};

/// Resampling filter used for every downsample in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Nearest neighbor - fast, aliases on line work
    Nearest,
    /// Linear (tent) filter
    Triangle,
    /// Cubic filter
    CatmullRom,
    /// Gaussian filter
    Gaussian,
    /// Lanczos with window 3 - sharpest, no moire on contour lines
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Parse from string (case-insensitive), falling back to Lanczos3.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            "triangle" | "bilinear" => Self::Triangle,
            "catmullrom" | "bicubic" => Self::CatmullRom,
            "gaussian" => Self::Gaussian,
            _ => Self::Lanczos3,
        }
    }
}

/// Default ceiling on the decoded pixel buffer of one raster, matching the
/// `image` crate's default allocation limit.
pub const DEFAULT_MAX_DECODE_BYTES: u64 = 512 * 1024 * 1024;

/// Configuration passed to every pipeline component at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Ceiling on the longer texture side in pixels.
    pub max_texture_dim: u32,

    /// Side length of the square heightmap output.
    pub heightmap_side: u32,

    /// JPEG quality for textures (1-100).
    pub texture_quality: u8,

    /// Standard deviation of the heightmap smoothing blur, in pixels.
    pub heightmap_blur_sigma: f32,

    /// Filter for texture and heightmap resizes.
    pub resample_filter: ResampleFilter,

    /// Largest decoded raster buffer accepted, in bytes.
    pub max_decode_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_texture_dim: 2048,
            heightmap_side: 512,
            texture_quality: 85,
            heightmap_blur_sigma: 1.0,
            resample_filter: ResampleFilter::Lanczos3,
            max_decode_bytes: DEFAULT_MAX_DECODE_BYTES,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MAX_TEXTURE_DIM") {
            if let Ok(dim) = val.parse() {
                config.max_texture_dim = dim;
            }
        }

        if let Ok(val) = std::env::var("HEIGHTMAP_SIDE") {
            if let Ok(side) = val.parse() {
                config.heightmap_side = side;
            }
        }

        if let Ok(val) = std::env::var("TEXTURE_QUALITY") {
            if let Ok(quality) = val.parse() {
                config.texture_quality = quality;
            }
        }

        if let Ok(val) = std::env::var("HEIGHTMAP_BLUR_SIGMA") {
            if let Ok(sigma) = val.parse() {
                config.heightmap_blur_sigma = sigma;
            }
        }

        if let Ok(val) = std::env::var("RESAMPLE_FILTER") {
            config.resample_filter = ResampleFilter::from_str(&val);
        }

        if let Ok(val) = std::env::var("MAX_DECODE_BYTES") {
            if let Ok(bytes) = val.parse() {
                config.max_decode_bytes = bytes;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_texture_dim == 0 {
            return Err("max_texture_dim must be > 0".to_string());
        }

        if self.heightmap_side == 0 {
            return Err("heightmap_side must be > 0".to_string());
        }

        if self.texture_quality == 0 || self.texture_quality > 100 {
            return Err("texture_quality must be 1-100".to_string());
        }

        if !self.heightmap_blur_sigma.is_finite() || self.heightmap_blur_sigma < 0.0 {
            return Err("heightmap_blur_sigma must be a non-negative number".to_string());
        }

        if self.max_decode_bytes == 0 {
            return Err("max_decode_bytes must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_texture_dim, 2048);
        assert_eq!(config.heightmap_side, 512);
        assert_eq!(config.texture_quality, 85);
        assert_eq!(config.max_decode_bytes, 512 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_quality() {
        let config = PipelineConfig {
            texture_quality: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_decode_ceiling() {
        let config = PipelineConfig {
            max_decode_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!(ResampleFilter::from_str("NEAREST"), ResampleFilter::Nearest);
        assert_eq!(ResampleFilter::from_str("bicubic"), ResampleFilter::CatmullRom);
        assert_eq!(ResampleFilter::from_str("unknown"), ResampleFilter::Lanczos3);
    }
}

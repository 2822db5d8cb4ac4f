//! Decoded raster model.

use image::{Rgb, RgbImage};
use terrain_common::EpsgCode;

use crate::error::{GeoTiffError, GeoTiffResult};

/// Affine map from pixel (col, row) to CRS coordinates, in GDAL order.
///
/// `x = origin_x + col * pixel_width + row * row_rotation`
/// `y = origin_y + col * col_rotation + row * pixel_height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform from the top-left corner and positive pixel sizes.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height: -pixel_height,
        }
    }

    /// Map a pixel-space position to CRS coordinates.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Move the origin from a pixel center to that pixel's top-left corner.
    pub fn center_to_corner(&self) -> Self {
        let (origin_x, origin_y) = self.apply(-0.5, -0.5);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }

    /// Envelope `(min_x, min_y, max_x, max_y)` of a `width` x `height` grid.
    pub fn extent(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let (w, h) = (width as f64, height as f64);
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(w, 0.0),
            self.apply(0.0, h),
            self.apply(w, h),
        ];

        corners.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }

    pub fn is_finite(&self) -> bool {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Native coordinate system and pixel-to-CRS mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georeference {
    pub crs: EpsgCode,
    pub transform: GeoTransform,
}

/// Bands selected for color output, resolved once at decode time.
///
/// Three or more bands: the first three in file order are red, green and
/// blue. Fewer: the first band is replicated into every channel.
#[derive(Debug, Clone, PartialEq)]
pub enum BandLayout {
    TrueColor {
        red: Vec<u8>,
        green: Vec<u8>,
        blue: Vec<u8>,
    },
    SingleBand {
        intensity: Vec<u8>,
    },
}

impl BandLayout {
    pub fn band_count(&self) -> usize {
        match self {
            BandLayout::TrueColor { .. } => 3,
            BandLayout::SingleBand { .. } => 1,
        }
    }

    fn planes(&self) -> [&[u8]; 3] {
        match self {
            BandLayout::TrueColor { red, green, blue } => [red, green, blue],
            BandLayout::SingleBand { intensity } => [intensity, intensity, intensity],
        }
    }
}

/// A decoded raster: 8-bit bands of equal size plus optional georeferencing.
#[derive(Debug, Clone)]
pub struct RasterDataset {
    width: u32,
    height: u32,
    bands: BandLayout,
    georeference: Option<Georeference>,
}

impl RasterDataset {
    /// Build a dataset, checking every band holds `width * height` samples.
    pub fn new(
        width: u32,
        height: u32,
        bands: BandLayout,
        georeference: Option<Georeference>,
    ) -> GeoTiffResult<Self> {
        if width == 0 || height == 0 {
            return Err(GeoTiffError::UnsupportedLayout(format!(
                "empty raster {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize;
        if let Some(plane) = bands.planes().iter().find(|p| p.len() != expected) {
            return Err(GeoTiffError::UnsupportedLayout(format!(
                "band has {} samples, expected {} for {}x{}",
                plane.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            width,
            height,
            bands,
            georeference,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bands(&self) -> &BandLayout {
        &self.bands
    }

    pub fn georeference(&self) -> Option<&Georeference> {
        self.georeference.as_ref()
    }

    /// Envelope of the raster in its native CRS.
    pub fn native_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.georeference
            .as_ref()
            .map(|g| g.transform.extent(self.width, self.height))
    }

    /// Interleave the selected bands into an 8-bit RGB image.
    pub fn to_rgb_image(&self) -> RgbImage {
        let [r, g, b] = self.bands.planes();
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = y as usize * width + x as usize;
            Rgb([r[i], g[i], b[i]])
        })
    }
}

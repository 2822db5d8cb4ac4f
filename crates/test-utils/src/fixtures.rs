//! GeoTIFF fixtures for decoder and pipeline tests.
//!
//! Fixtures are written with the same GeoTIFF tags a GIS export produces:
//! ModelPixelScale + ModelTiepoint (or a ModelTransformation matrix) and a
//! GeoKeyDirectory naming the EPSG code.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tiff::encoder::colortype::{Gray16, Gray32Float, Gray8, RGB8, RGBA8};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::TiffResult;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;

/// EPSG "user-defined" sentinel used by GeoKeys.
pub const USER_DEFINED_CRS: u16 = 32767;

/// Pixel payload of a fixture, interleaved row-major.
#[derive(Debug, Clone)]
pub enum FixturePixels {
    Gray8(Vec<u8>),
    Gray16(Vec<u16>),
    GrayF32(Vec<f32>),
    Rgb8(Vec<u8>),
    Rgba8(Vec<u8>),
}

/// Georeferencing written into a fixture.
#[derive(Debug, Clone, Copy)]
pub struct FixtureGeoreference {
    /// EPSG code stored in the GeoKeyDirectory
    pub epsg: u16,
    /// World coordinate of the top-left pixel corner
    pub origin: (f64, f64),
    /// Pixel size (x, y), both positive
    pub pixel_size: (f64, f64),
    /// Write RasterPixelIsPoint instead of RasterPixelIsArea
    pub pixel_is_point: bool,
    /// Write a ModelTransformation matrix instead of scale + tiepoint
    pub as_matrix: bool,
}

impl FixtureGeoreference {
    pub fn new(epsg: u16, origin: (f64, f64), pixel_size: (f64, f64)) -> Self {
        Self {
            epsg,
            origin,
            pixel_size,
            pixel_is_point: false,
            as_matrix: false,
        }
    }

    fn is_geographic(&self) -> bool {
        matches!(self.epsg, 4326 | 4269 | 4258 | 4283)
    }
}

/// A raster to be written as a (Geo)TIFF.
#[derive(Debug, Clone)]
pub struct GeoTiffFixture {
    pub width: u32,
    pub height: u32,
    pub pixels: FixturePixels,
    pub georeference: Option<FixtureGeoreference>,
}

impl GeoTiffFixture {
    /// Write the fixture to `path`.
    pub fn write(&self, path: &Path) -> TiffResult<()> {
        let file = File::create(path)?;
        let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
        let (w, h) = (self.width, self.height);

        match &self.pixels {
            FixturePixels::Gray8(data) => {
                let mut image = encoder.new_image::<Gray8>(w, h)?;
                self.write_geo_tags(image.encoder())?;
                image.write_data(data)?;
            }
            FixturePixels::Gray16(data) => {
                let mut image = encoder.new_image::<Gray16>(w, h)?;
                self.write_geo_tags(image.encoder())?;
                image.write_data(data)?;
            }
            FixturePixels::GrayF32(data) => {
                let mut image = encoder.new_image::<Gray32Float>(w, h)?;
                self.write_geo_tags(image.encoder())?;
                image.write_data(data)?;
            }
            FixturePixels::Rgb8(data) => {
                let mut image = encoder.new_image::<RGB8>(w, h)?;
                self.write_geo_tags(image.encoder())?;
                image.write_data(data)?;
            }
            FixturePixels::Rgba8(data) => {
                let mut image = encoder.new_image::<RGBA8>(w, h)?;
                self.write_geo_tags(image.encoder())?;
                image.write_data(data)?;
            }
        }
        Ok(())
    }

    fn write_geo_tags<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<W, K>,
    ) -> TiffResult<()> {
        let Some(geo) = self.georeference else {
            return Ok(());
        };

        if geo.as_matrix {
            // Row-major 4x4 affine, north-up
            let matrix = [
                geo.pixel_size.0, 0.0, 0.0, geo.origin.0,
                0.0, -geo.pixel_size.1, 0.0, geo.origin.1,
                0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ];
            dir.write_tag(Tag::Unknown(MODEL_TRANSFORMATION), matrix.as_slice())?;
        } else {
            let scale = [geo.pixel_size.0, geo.pixel_size.1, 0.0];
            dir.write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), scale.as_slice())?;

            // PixelIsPoint tiepoints name the pixel center
            let (tie_x, tie_y) = if geo.pixel_is_point {
                (
                    geo.origin.0 + geo.pixel_size.0 / 2.0,
                    geo.origin.1 - geo.pixel_size.1 / 2.0,
                )
            } else {
                geo.origin
            };
            let tiepoint = [0.0, 0.0, 0.0, tie_x, tie_y, 0.0];
            dir.write_tag(Tag::Unknown(MODEL_TIEPOINT), tiepoint.as_slice())?;
        }

        let (model_type, crs_key) = if geo.is_geographic() {
            (2u16, 2048u16)
        } else {
            (1u16, 3072u16)
        };
        let raster_type = if geo.pixel_is_point { 2u16 } else { 1u16 };
        let geokeys: [u16; 16] = [
            1, 1, 0, 3, // header: version, revision, minor, key count
            1024, 0, 1, model_type,
            1025, 0, 1, raster_type,
            crs_key, 0, 1, geo.epsg,
        ];
        dir.write_tag(Tag::Unknown(GEO_KEY_DIRECTORY), geokeys.as_slice())?;

        Ok(())
    }
}

/// A scratch directory that is removed when dropped.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create scratch directory")
}

/// Write `fixture` into `dir` under `name` and return the full path.
pub fn write_fixture(dir: &TempDir, name: &str, fixture: &GeoTiffFixture) -> PathBuf {
    let path = dir.path().join(name);
    fixture
        .write(&path)
        .unwrap_or_else(|e| panic!("Failed to write fixture {}: {}", path.display(), e));
    path
}

/// Write arbitrary bytes into `dir` under `name` and return the full path.
pub fn write_bytes(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
    path
}

/// Bytes that start like a little-endian TIFF but carry no valid IFD.
pub fn corrupt_tiff_bytes() -> Vec<u8> {
    let mut bytes = b"II*\0".to_vec();
    bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0x7f]);
    bytes.extend(std::iter::repeat(0xab).take(64));
    bytes
}

/// A little-endian Gray8 TIFF whose header declares `width` x `height` pixels
/// but which carries a single 16-byte strip.
pub fn oversized_tiff_bytes(width: u32, height: u32) -> Vec<u8> {
    // (tag, type, value); type 3 is SHORT, 4 is LONG
    const ENTRY_COUNT: u32 = 9;
    let strip_offset = 8 + 2 + ENTRY_COUNT * 12 + 4;
    let entries: [(u16, u16, u32); ENTRY_COUNT as usize] = [
        (256, 4, width),
        (257, 4, height),
        (258, 3, 8),
        (259, 3, 1),
        (262, 3, 1),
        (273, 4, strip_offset),
        (277, 3, 1),
        (278, 4, height),
        (279, 4, 16),
    ];

    let mut bytes = b"II*\0".to_vec();
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(&(ENTRY_COUNT as u16).to_le_bytes());
    for (tag, kind, value) in entries {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&kind.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&[0x80; 16]);
    bytes
}

/// Common geographic extents as (west, south, east, north).
pub mod extents {
    /// Kauai, Hawaii: one degree square, inside UTM zone 4N
    pub const KAUAI: (f64, f64, f64, f64) = (-160.0, 21.5, -159.0, 22.5);

    /// Yosemite valley area: inside UTM zone 11N
    pub const YOSEMITE: (f64, f64, f64, f64) = (-119.8, 37.6, -119.4, 37.9);

    /// Crosses the antimeridian
    pub const FIJI: (f64, f64, f64, f64) = (177.0, -19.0, -179.0, -16.0);
}

//! TIFF + PROJ backend for the raster decoder.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use projection::{transform_bounds, CoordTransformer, DEFAULT_DENSIFY_POINTS};
use terrain_common::{GeoBounds, DEFAULT_MAX_DECODE_BYTES};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

use crate::dataset::{BandLayout, GeoTransform, Georeference, RasterDataset};
use crate::error::{GeoTiffError, GeoTiffResult};
use crate::geokeys::GeoKeys;
use crate::samples::extract_planes;
use crate::RasterBackend;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;

/// Decodes with the `tiff` crate and reprojects with `proj4rs`.
///
/// The pixel buffer a header declares is checked against `max_decode_bytes`
/// before any of it is allocated.
#[derive(Debug, Clone, Copy)]
pub struct TiffBackend {
    max_decode_bytes: u64,
}

impl Default for TiffBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECODE_BYTES)
    }
}

impl TiffBackend {
    pub fn new(max_decode_bytes: u64) -> Self {
        Self { max_decode_bytes }
    }

    fn limits(&self) -> Limits {
        let ceiling = usize::try_from(self.max_decode_bytes).unwrap_or(usize::MAX);
        let mut limits = Limits::default();
        limits.decoding_buffer_size = ceiling;
        limits.intermediate_buffer_size = ceiling;
        limits
    }

    /// Reject rasters whose decoded size would exceed the ceiling.
    fn check_decoded_size<R: Read + Seek>(
        &self,
        decoder: &mut Decoder<R>,
        width: u32,
        height: u32,
    ) -> GeoTiffResult<()> {
        let samples_per_pixel = find_u32s(decoder, Tag::SamplesPerPixel)?
            .and_then(|v| v.first().copied())
            .unwrap_or(1)
            .max(1);
        let bits_per_sample = find_u32s(decoder, Tag::BitsPerSample)?
            .and_then(|v| v.into_iter().max())
            .unwrap_or(8);
        let bytes_per_sample = u64::from(bits_per_sample.div_ceil(8).max(1));

        let declared = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|n| n.checked_mul(u64::from(samples_per_pixel)))
            .and_then(|n| n.checked_mul(bytes_per_sample));

        match declared {
            Some(bytes) if bytes <= self.max_decode_bytes => Ok(()),
            _ => Err(GeoTiffError::decode(
                "TIFF pixel data",
                format!(
                    "{}x{} raster with {} samples of {} bits exceeds the {} byte decode limit",
                    width, height, samples_per_pixel, bits_per_sample, self.max_decode_bytes
                ),
            )),
        }
    }
}

impl RasterBackend for TiffBackend {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn read(&self, path: &Path) -> GeoTiffResult<RasterDataset> {
        let mut reader = BufReader::new(File::open(path)?);
        check_signature(&mut reader, path)?;

        let mut decoder = Decoder::new(reader)
            .map_err(|e| GeoTiffError::decode("TIFF header", e))?
            .with_limits(self.limits());

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| GeoTiffError::decode("TIFF dimensions", e))?;
        self.check_decoded_size(&mut decoder, width, height)?;
        let georeference = read_georeference(&mut decoder)?;

        let image = decoder
            .read_image()
            .map_err(|e| GeoTiffError::decode("TIFF pixel data", e))?;
        let bands = band_layout(image, width as usize * height as usize)?;

        debug!(
            path = %path.display(),
            width,
            height,
            bands = bands.band_count(),
            epsg = ?georeference.map(|g| g.crs.code()),
            "Decoded TIFF"
        );

        RasterDataset::new(width, height, bands, georeference)
    }

    fn to_geographic(&self, georef: &Georeference, width: u32, height: u32) -> GeoTiffResult<GeoBounds> {
        let (min_x, min_y, max_x, max_y) = georef.transform.extent(width, height);
        let transformer = CoordTransformer::to_lonlat_from(georef.crs)
            .map_err(|e| GeoTiffError::Projection(e.into()))?;
        let (west, south, east, north) =
            transform_bounds(&transformer, min_x, min_y, max_x, max_y, DEFAULT_DENSIFY_POINTS)
                .map_err(|e| GeoTiffError::Projection(e.into()))?;

        GeoBounds::from_envelope(west, south, east, north)
            .validated()
            .map_err(GeoTiffError::Projection)
    }
}

fn check_signature<R: BufRead>(reader: &mut R, path: &Path) -> GeoTiffResult<()> {
    let head = reader.fill_buf()?;
    let is_tiff = head.len() >= 4
        && (head[..4] == *b"II*\0"
            || head[..4] == *b"MM\0*"
            || head[..4] == *b"II+\0"
            || head[..4] == *b"MM\0+");
    if is_tiff {
        Ok(())
    } else {
        Err(GeoTiffError::NotTiff(path.display().to_string()))
    }
}

fn band_layout(image: DecodingResult, pixels: usize) -> GeoTiffResult<BandLayout> {
    let samples = match &image {
        DecodingResult::U8(d) => d.len(),
        DecodingResult::U16(d) => d.len(),
        DecodingResult::U32(d) => d.len(),
        DecodingResult::U64(d) => d.len(),
        DecodingResult::I8(d) => d.len(),
        DecodingResult::I16(d) => d.len(),
        DecodingResult::I32(d) => d.len(),
        DecodingResult::I64(d) => d.len(),
        DecodingResult::F32(d) => d.len(),
        DecodingResult::F64(d) => d.len(),
    };
    if pixels == 0 || samples % pixels != 0 {
        return Err(GeoTiffError::UnsupportedLayout(format!(
            "{} samples do not divide into {} pixels",
            samples, pixels
        )));
    }

    let samples_per_pixel = samples / pixels;
    let channels: &[usize] = if samples_per_pixel >= 3 { &[0, 1, 2] } else { &[0] };

    let mut planes = match &image {
        DecodingResult::U8(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::U16(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::U32(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::U64(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::I8(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::I16(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::I32(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::I64(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::F32(d) => extract_planes(d, samples_per_pixel, channels),
        DecodingResult::F64(d) => extract_planes(d, samples_per_pixel, channels),
    };

    Ok(if planes.len() == 3 {
        let blue = planes.remove(2);
        let green = planes.remove(1);
        let red = planes.remove(0);
        BandLayout::TrueColor { red, green, blue }
    } else {
        BandLayout::SingleBand {
            intensity: planes.remove(0),
        }
    })
}

fn find_u32s<R: Read + Seek>(decoder: &mut Decoder<R>, tag: Tag) -> GeoTiffResult<Option<Vec<u32>>> {
    let value = decoder
        .find_tag(tag)
        .map_err(|e| GeoTiffError::decode(format!("tag {:?}", tag), e))?;
    value
        .map(|v| v.into_u32_vec())
        .transpose()
        .map_err(|e| GeoTiffError::decode(format!("tag {:?}", tag), e))
}

fn find_f64s<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> GeoTiffResult<Option<Vec<f64>>> {
    let value = decoder
        .find_tag(Tag::from_u16_exhaustive(code))
        .map_err(|e| GeoTiffError::decode(format!("tag {}", code), e))?;
    value
        .map(|v| v.into_f64_vec())
        .transpose()
        .map_err(|e| GeoTiffError::decode(format!("tag {}", code), e))
}

fn read_georeference<R: Read + Seek>(decoder: &mut Decoder<R>) -> GeoTiffResult<Option<Georeference>> {
    let directory = decoder
        .find_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
        .map_err(|e| GeoTiffError::decode("GeoKeyDirectory", e))?
        .map(|v| v.into_u32_vec())
        .transpose()
        .map_err(|e| GeoTiffError::decode("GeoKeyDirectory", e))?;
    let transformation = find_f64s(decoder, MODEL_TRANSFORMATION)?;
    let scale = find_f64s(decoder, MODEL_PIXEL_SCALE)?;
    let tiepoint = find_f64s(decoder, MODEL_TIEPOINT)?;

    let Some(directory) = directory else {
        if transformation.is_some() || tiepoint.is_some() {
            return Err(GeoTiffError::MissingGeoreference(
                "raster is placed but has no GeoKeyDirectory".to_string(),
            ));
        }
        return Ok(None);
    };

    let directory: Vec<u16> = directory.into_iter().map(|v| v as u16).collect();
    let keys = GeoKeys::parse(&directory)?;
    let crs = keys.epsg()?;

    let transform = match (transformation, scale, tiepoint) {
        (Some(m), _, _) => from_matrix(&m)?,
        (None, Some(scale), Some(tie)) => from_tiepoint(&scale, &tie)?,
        _ => {
            return Err(GeoTiffError::MissingGeoreference(
                "no ModelTransformation or ModelPixelScale + ModelTiepoint".to_string(),
            ))
        }
    };

    let transform = if keys.pixel_is_point() {
        transform.center_to_corner()
    } else {
        transform
    };
    if !transform.is_finite() {
        return Err(GeoTiffError::InvalidGeoreference(
            "non-finite geotransform".to_string(),
        ));
    }

    Ok(Some(Georeference { crs, transform }))
}

fn from_matrix(m: &[f64]) -> GeoTiffResult<GeoTransform> {
    if m.len() < 16 {
        return Err(GeoTiffError::InvalidGeoreference(format!(
            "ModelTransformation has {} values, expected 16",
            m.len()
        )));
    }
    Ok(GeoTransform {
        origin_x: m[3],
        pixel_width: m[0],
        row_rotation: m[1],
        origin_y: m[7],
        col_rotation: m[4],
        pixel_height: m[5],
    })
}

fn from_tiepoint(scale: &[f64], tie: &[f64]) -> GeoTiffResult<GeoTransform> {
    if scale.len() < 2 || tie.len() < 6 {
        return Err(GeoTiffError::InvalidGeoreference(format!(
            "ModelPixelScale/ModelTiepoint too short ({}, {})",
            scale.len(),
            tie.len()
        )));
    }
    let (sx, sy) = (scale[0], scale[1]);
    let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
    Ok(GeoTransform::north_up(x - i * sx, y + j * sy, sx, sy))
}

//! GeoKeyDirectory parsing.
//!
//! The directory is a flat SHORT array: a 4-value header
//! (version, revision, minor revision, key count) followed by one
//! 4-value entry per key (key id, tag location, count, value). Only keys
//! stored inline (tag location 0) are needed here.

use terrain_common::EpsgCode;

use crate::error::{GeoTiffError, GeoTiffResult};

pub const GT_MODEL_TYPE: u16 = 1024;
pub const GT_RASTER_TYPE: u16 = 1025;
pub const GEOGRAPHIC_TYPE: u16 = 2048;
pub const PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_POINT: u16 = 2;
const USER_DEFINED: u16 = 32767;

/// The GeoKeys needed to resolve a CRS and pixel registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKeys {
    pub model_type: Option<u16>,
    pub raster_type: Option<u16>,
    pub geographic_type: Option<u16>,
    pub projected_type: Option<u16>,
}

impl GeoKeys {
    pub fn parse(directory: &[u16]) -> GeoTiffResult<Self> {
        if directory.len() < 4 {
            return Err(GeoTiffError::InvalidGeoreference(format!(
                "GeoKeyDirectory too short ({} values)",
                directory.len()
            )));
        }

        let key_count = directory[3] as usize;
        let entries = &directory[4..];
        if entries.len() < key_count * 4 {
            return Err(GeoTiffError::InvalidGeoreference(format!(
                "GeoKeyDirectory declares {} keys but holds {}",
                key_count,
                entries.len() / 4
            )));
        }

        let mut keys = GeoKeys::default();
        for entry in entries.chunks_exact(4).take(key_count) {
            let (id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 {
                // Value lives in GeoDoubleParams/GeoAsciiParams
                continue;
            }
            match id {
                GT_MODEL_TYPE => keys.model_type = Some(value),
                GT_RASTER_TYPE => keys.raster_type = Some(value),
                GEOGRAPHIC_TYPE => keys.geographic_type = Some(value),
                PROJECTED_CS_TYPE => keys.projected_type = Some(value),
                _ => {}
            }
        }

        Ok(keys)
    }

    /// Tiepoints reference pixel centers rather than corners.
    pub fn pixel_is_point(&self) -> bool {
        self.raster_type == Some(RASTER_PIXEL_IS_POINT)
    }

    /// Resolve the EPSG code of the raster's CRS.
    pub fn epsg(&self) -> GeoTiffResult<EpsgCode> {
        let code = match self.model_type {
            Some(MODEL_TYPE_PROJECTED) => self.projected_type,
            Some(MODEL_TYPE_GEOGRAPHIC) => self.geographic_type,
            Some(other) if other != USER_DEFINED => {
                return Err(GeoTiffError::UnsupportedCrs(format!(
                    "model type {} is neither projected nor geographic",
                    other
                )));
            }
            _ => self.projected_type.or(self.geographic_type),
        };

        match code {
            None => Err(GeoTiffError::MissingGeoreference(
                "GeoKeyDirectory names no CRS".to_string(),
            )),
            Some(USER_DEFINED) => Err(GeoTiffError::UnsupportedCrs(
                "user-defined CRS".to_string(),
            )),
            Some(code) => Ok(EpsgCode(code as u32)),
        }
    }
}

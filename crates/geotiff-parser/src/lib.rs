//! GeoTIFF decoder for contour maps.
//!
//! Reads band data and georeferencing from a GeoTIFF and reports the map's
//! extent as WGS84 [`GeoBounds`]. Decoding needs the `georeferencing`
//! feature; without it a [`RasterDecoder`] still builds but reports itself
//! as unavailable and every call fails with
//! [`TerrainError::GeoreferencingUnavailable`].
//!
//! # Example
//!
//! ```ignore
//! use geotiff_parser::RasterDecoder;
//!
//! let decoder = RasterDecoder::detect();
//! let decoded = decoder.decode(Path::new("uploads/kauai.tif"))?;
//! println!("{:?}", decoded.bounds);
//! ```

#[cfg(feature = "georeferencing")]
pub mod backend;
pub mod dataset;
pub mod error;
pub mod geokeys;
#[cfg(feature = "georeferencing")]
mod samples;

#[cfg(feature = "georeferencing")]
pub use backend::TiffBackend;
pub use dataset::{BandLayout, GeoTransform, Georeference, RasterDataset};
pub use error::{GeoTiffError, GeoTiffResult};
pub use geokeys::GeoKeys;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use terrain_common::{GeoBounds, TerrainError, TerrainResult};
use tracing::{debug, info};

/// A raster decoding implementation the decoder can be handed.
pub trait RasterBackend: Send + Sync {
    /// Short name for logs and health output.
    fn name(&self) -> &'static str;

    /// Read bands and georeferencing from `path`.
    fn read(&self, path: &Path) -> GeoTiffResult<RasterDataset>;

    /// Reproject a `width` x `height` grid's native extent to WGS84 bounds.
    fn to_geographic(&self, georef: &Georeference, width: u32, height: u32) -> GeoTiffResult<GeoBounds>;
}

/// A decoded raster together with its geographic extent.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub dataset: RasterDataset,
    pub bounds: GeoBounds,
}

/// Entry point for georeferenced raster decoding.
///
/// Availability is fixed at construction. An unavailable decoder fails
/// before touching the file, so a missing capability is never confused
/// with a corrupt input.
#[derive(Clone)]
pub struct RasterDecoder {
    backend: Option<Arc<dyn RasterBackend>>,
}

impl fmt::Debug for RasterDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterDecoder")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl RasterDecoder {
    /// Use the backend compiled into this build, if any.
    pub fn detect() -> Self {
        Self::detect_with_limit(terrain_common::DEFAULT_MAX_DECODE_BYTES)
    }

    /// Like [`RasterDecoder::detect`], capping the decoded buffer of one raster.
    pub fn detect_with_limit(max_decode_bytes: u64) -> Self {
        #[cfg(feature = "georeferencing")]
        let decoder = Self::with_backend(Arc::new(TiffBackend::new(max_decode_bytes)));
        #[cfg(not(feature = "georeferencing"))]
        let decoder = Self::unavailable();

        info!(
            available = decoder.is_available(),
            max_decode_bytes,
            "Raster decoding capability"
        );
        decoder
    }

    /// A decoder with no capability.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Arc<dyn RasterBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> TerrainResult<&dyn RasterBackend> {
        self.backend.as_deref().ok_or_else(|| {
            TerrainError::GeoreferencingUnavailable(
                "this build has no raster decoding backend".to_string(),
            )
        })
    }

    /// Read a raster. Georeferencing is optional at this stage.
    pub fn open(&self, path: &Path) -> TerrainResult<RasterDataset> {
        let backend = self.backend()?;
        backend.read(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "Raster decode failed");
            e.into()
        })
    }

    /// Geographic extent of an already decoded raster.
    pub fn geographic_bounds(&self, dataset: &RasterDataset) -> TerrainResult<GeoBounds> {
        let backend = self.backend()?;
        let georef = dataset.georeference().ok_or_else(|| {
            TerrainError::MissingGeoreference("raster has no CRS or geotransform".to_string())
        })?;
        let bounds = backend.to_geographic(georef, dataset.width(), dataset.height())?;

        debug!(
            epsg = georef.crs.code(),
            north = bounds.north,
            south = bounds.south,
            east = bounds.east,
            west = bounds.west,
            "Reprojected raster bounds"
        );
        Ok(bounds)
    }

    /// Read a georeferenced raster and its WGS84 bounds.
    pub fn decode(&self, path: &Path) -> TerrainResult<DecodedRaster> {
        let dataset = self.open(path)?;
        let bounds = self.geographic_bounds(&dataset)?;
        Ok(DecodedRaster { dataset, bounds })
    }
}

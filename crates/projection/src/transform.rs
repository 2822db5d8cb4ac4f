//! Point transforms between EPSG coordinate systems.

use proj4rs::proj::Proj;
use terrain_common::EpsgCode;

use crate::definitions::proj_string;
use crate::mercator;
use crate::ProjectionError;

/// How a transformer moves points between its two systems.
enum Strategy {
    /// Source and target are the same CRS
    Identity,
    /// Inline spherical inverse for EPSG:3857 to EPSG:4326
    MercatorToLonLat,
    /// Inline spherical forward for EPSG:4326 to EPSG:3857
    LonLatToMercator,
    /// General case through proj4rs
    Proj4rs {
        source: Box<Proj>,
        target: Box<Proj>,
        source_is_geographic: bool,
        target_is_geographic: bool,
    },
}

/// Reusable transformer between two EPSG coordinate systems.
///
/// Geographic systems take and return degrees; projected systems use their
/// native linear units.
pub struct CoordTransformer {
    source: EpsgCode,
    target: EpsgCode,
    strategy: Strategy,
}

impl std::fmt::Debug for CoordTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl CoordTransformer {
    /// Create a transformer between any two supported codes.
    pub fn new(source: EpsgCode, target: EpsgCode) -> Result<Self, ProjectionError> {
        let strategy = if source == target
            || (source.is_web_mercator() && target.is_web_mercator())
        {
            Strategy::Identity
        } else if source.is_web_mercator() && target == EpsgCode::WGS84 {
            Strategy::MercatorToLonLat
        } else if source == EpsgCode::WGS84 && target.is_web_mercator() {
            Strategy::LonLatToMercator
        } else {
            Strategy::Proj4rs {
                source: Box::new(load(source)?),
                target: Box::new(load(target)?),
                source_is_geographic: source.is_geographic(),
                target_is_geographic: target.is_geographic(),
            }
        };

        Ok(Self {
            source,
            target,
            strategy,
        })
    }

    /// Create a transformer from another CRS to WGS84 lon/lat.
    pub fn to_lonlat_from(source: EpsgCode) -> Result<Self, ProjectionError> {
        Self::new(source, EpsgCode::WGS84)
    }

    /// Create a transformer from WGS84 lon/lat to another CRS.
    pub fn from_lonlat_to(target: EpsgCode) -> Result<Self, ProjectionError> {
        Self::new(EpsgCode::WGS84, target)
    }

    pub fn source(&self) -> EpsgCode {
        self.source
    }

    pub fn target(&self) -> EpsgCode {
        self.target
    }

    /// Transform a single coordinate pair.
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        match &self.strategy {
            Strategy::Identity => Ok((x, y)),
            Strategy::MercatorToLonLat => Ok((
                mercator::mercator_x_to_lon(x),
                mercator::mercator_y_to_lat(y),
            )),
            Strategy::LonLatToMercator => Ok((
                mercator::lon_to_mercator_x(x),
                mercator::lat_to_mercator_y(y),
            )),
            Strategy::Proj4rs {
                source,
                target,
                source_is_geographic,
                target_is_geographic,
            } => {
                // proj4rs works in radians for geographic systems
                let mut point = if *source_is_geographic {
                    (x.to_radians(), y.to_radians(), 0.0)
                } else {
                    (x, y, 0.0)
                };

                proj4rs::transform::transform(source, target, &mut point).map_err(|e| {
                    ProjectionError::TransformFailed(format!(
                        "{} -> {} at ({}, {}): {:?}",
                        self.source, self.target, x, y, e
                    ))
                })?;

                let (out_x, out_y) = if *target_is_geographic {
                    (point.0.to_degrees(), point.1.to_degrees())
                } else {
                    (point.0, point.1)
                };

                if !out_x.is_finite() || !out_y.is_finite() {
                    return Err(ProjectionError::TransformFailed(format!(
                        "{} -> {} at ({}, {}) produced a non-finite result",
                        self.source, self.target, x, y
                    )));
                }

                Ok((out_x, out_y))
            }
        }
    }
}

fn load(code: EpsgCode) -> Result<Proj, ProjectionError> {
    let definition = proj_string(code).ok_or(ProjectionError::UnsupportedCrs(code))?;
    Proj::from_proj_string(&definition).map_err(|e| ProjectionError::InvalidDefinition {
        code,
        message: format!("{:?}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = CoordTransformer::new(EpsgCode::WGS84, EpsgCode::WGS84).unwrap();
        assert_eq!(t.transform(-159.5, 22.0).unwrap(), (-159.5, 22.0));
    }

    #[test]
    fn test_mercator_fast_path() {
        let t = CoordTransformer::to_lonlat_from(EpsgCode::WEB_MERCATOR).unwrap();
        let (lon, lat) = t.transform(20037508.342789244, 0.0).unwrap();
        assert!((lon - 180.0).abs() < 1e-9);
        assert!(lat.abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_code() {
        let err = CoordTransformer::to_lonlat_from(EpsgCode(99999)).unwrap_err();
        assert!(matches!(err, ProjectionError::UnsupportedCrs(EpsgCode(99999))));
    }

    #[test]
    fn test_utm_central_meridian() {
        // Zone 4 central meridian is -159; false easting puts it at x=500000
        let t = CoordTransformer::to_lonlat_from(EpsgCode(32604)).unwrap();
        let (lon, lat) = t.transform(500000.0, 0.0).unwrap();
        assert!((lon - (-159.0)).abs() < 1e-6, "lon = {}", lon);
        assert!(lat.abs() < 1e-6, "lat = {}", lat);
    }
}

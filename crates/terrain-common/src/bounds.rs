//! Geographic bounding rectangle types.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Geographic extent of a map in decimal degrees (WGS84 longitude/latitude).
///
/// West longitudes are negative. For maps that do not cross the antimeridian
/// `west <= east` holds; `north > south` always holds for a valid rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Create bounds from the four edges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Create bounds from an envelope in `(min_lon, min_lat, max_lon, max_lat)` order.
    pub fn from_envelope(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            north: max_lat,
            south: min_lat,
            east: max_lon,
            west: min_lon,
        }
    }

    /// Check the rectangle invariants, returning the bounds unchanged if they hold.
    ///
    /// Rejects non-finite edges, `north <= south` and latitudes outside ±90.
    /// Longitudes may be in any order so antimeridian-crossing maps pass.
    pub fn validated(self) -> Result<Self, TerrainError> {
        let edges = [self.north, self.south, self.east, self.west];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(TerrainError::InvalidBounds(format!(
                "non-finite edge in {:?}",
                self
            )));
        }
        if self.north <= self.south {
            return Err(TerrainError::InvalidBounds(format!(
                "north ({}) must be greater than south ({})",
                self.north, self.south
            )));
        }
        if self.north > 90.0 || self.south < -90.0 {
            return Err(TerrainError::InvalidBounds(format!(
                "latitude out of range: south={}, north={}",
                self.south, self.north
            )));
        }
        Ok(self)
    }

    /// Whether the map wraps across ±180° longitude.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// East-west extent in degrees, accounting for antimeridian wrap.
    pub fn width(&self) -> f64 {
        if self.crosses_antimeridian() {
            360.0 - (self.west - self.east)
        } else {
            self.east - self.west
        }
    }

    /// North-south extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        let mut lon = self.west + self.width() / 2.0;
        if lon > 180.0 {
            lon -= 360.0;
        }
        (lon, (self.north + self.south) / 2.0)
    }

    /// Check if a point is contained within the rectangle.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let in_lat = lat >= self.south && lat <= self.north;
        let in_lon = if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        };
        in_lat && in_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_envelope() {
        let b = GeoBounds::from_envelope(-160.0, 21.5, -159.0, 22.5);
        assert_eq!(b.west, -160.0);
        assert_eq!(b.south, 21.5);
        assert_eq!(b.east, -159.0);
        assert_eq!(b.north, 22.5);
    }

    #[test]
    fn test_validated_rejects_inverted() {
        let b = GeoBounds::new(10.0, 20.0, 5.0, 0.0);
        assert!(matches!(b.validated(), Err(TerrainError::InvalidBounds(_))));
    }

    #[test]
    fn test_antimeridian_width() {
        let b = GeoBounds::new(10.0, -10.0, -170.0, 170.0);
        assert!(b.crosses_antimeridian());
        assert!((b.width() - 20.0).abs() < 1e-9);
        assert!(b.contains(179.0, 0.0));
        assert!(b.contains(-175.0, 0.0));
        assert!(!b.contains(0.0, 0.0));
    }
}

//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An EPSG coordinate reference system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpsgCode(pub u32);

impl EpsgCode {
    /// WGS84 Geographic (lon/lat in degrees)
    pub const WGS84: EpsgCode = EpsgCode(4326);
    /// Web Mercator (meters)
    pub const WEB_MERCATOR: EpsgCode = EpsgCode(3857);
    /// Legacy Google alias for Web Mercator
    pub const GOOGLE_MERCATOR: EpsgCode = EpsgCode(900913);

    /// Numeric code.
    pub fn code(&self) -> u32 {
        self.0
    }

    /// Check if this is a geographic (lon/lat degrees) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self.0, 4326 | 4269 | 4258 | 4283)
    }

    /// Check if this is Web Mercator under either of its codes.
    pub fn is_web_mercator(&self) -> bool {
        matches!(self.0, 3857 | 900913)
    }

    /// UTM zone and hemisphere (`true` = north) for WGS84, NAD83 and ETRS89 UTM codes.
    pub fn utm_zone(&self) -> Option<(u8, bool)> {
        match self.0 {
            32601..=32660 => Some(((self.0 - 32600) as u8, true)),
            32701..=32760 => Some(((self.0 - 32700) as u8, false)),
            26901..=26923 => Some(((self.0 - 26900) as u8, true)),
            25828..=25838 => Some(((self.0 - 25800) as u8, true)),
            _ => None,
        }
    }
}

impl fmt::Display for EpsgCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for EpsgCode {
    type Err = CrsParseError;

    /// Accepts "EPSG:4326", "epsg:4326", "4326" and "CRS:84".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        if normalized == "CRS:84" {
            return Ok(EpsgCode::WGS84);
        }
        let digits = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);
        digits
            .parse::<u32>()
            .map(EpsgCode)
            .map_err(|_| CrsParseError::InvalidCode(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Invalid CRS code: {0}")]
    InvalidCode(String),
}

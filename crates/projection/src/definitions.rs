//! PROJ.4 definitions for the supported EPSG codes.

use terrain_common::EpsgCode;

const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";
const NAD83_LONLAT: &str = "+proj=longlat +datum=NAD83 +no_defs";
const GRS80_LONLAT: &str = "+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs";
const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";
const CONUS_ALBERS: &str = "+proj=aea +lat_0=23 +lon_0=-96 +lat_1=29.5 +lat_2=45.5 +x_0=0 +y_0=0 +datum=NAD83 +units=m +no_defs";
const ETRS89_LAEA: &str = "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";
const LAMBERT_93: &str = "+proj=lcc +lat_0=46.5 +lon_0=3 +lat_1=49 +lat_2=44 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Get the PROJ.4 string for an EPSG code, or `None` if the code is not supported.
pub fn proj_string(code: EpsgCode) -> Option<String> {
    let fixed = match code.code() {
        4326 => Some(WGS84_LONLAT),
        4269 => Some(NAD83_LONLAT),
        4258 | 4283 => Some(GRS80_LONLAT),
        3857 | 900913 => Some(WEB_MERCATOR),
        5070 => Some(CONUS_ALBERS),
        3035 => Some(ETRS89_LAEA),
        2154 => Some(LAMBERT_93),
        _ => None,
    };
    if let Some(def) = fixed {
        return Some(def.to_string());
    }

    let (zone, north) = code.utm_zone()?;
    let south = if north { "" } else { "+south " };
    let datum = match code.code() {
        26901..=26923 => "+datum=NAD83",
        25828..=25838 => "+ellps=GRS80 +towgs84=0,0,0,0,0,0,0",
        _ => "+datum=WGS84",
    };
    Some(format!(
        "+proj=utm +zone={} {}{} +units=m +no_defs",
        zone, south, datum
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_definitions() {
        assert!(proj_string(EpsgCode::WGS84).unwrap().contains("longlat"));
        assert!(proj_string(EpsgCode::WEB_MERCATOR).unwrap().contains("merc"));
        assert_eq!(
            proj_string(EpsgCode::GOOGLE_MERCATOR),
            proj_string(EpsgCode::WEB_MERCATOR)
        );
    }

    #[test]
    fn test_utm_definitions() {
        let north = proj_string(EpsgCode(32604)).unwrap();
        assert_eq!(north, "+proj=utm +zone=4 +datum=WGS84 +units=m +no_defs");

        let south = proj_string(EpsgCode(32755)).unwrap();
        assert!(south.contains("+zone=55"));
        assert!(south.contains("+south"));

        let nad83 = proj_string(EpsgCode(26910)).unwrap();
        assert!(nad83.contains("+datum=NAD83"));
    }

    #[test]
    fn test_unsupported() {
        assert!(proj_string(EpsgCode(99999)).is_none());
        assert!(proj_string(EpsgCode(32767)).is_none());
    }
}

//! Spherical Web Mercator (EPSG:3857) conversions.

/// WGS84 semi-major axis used as the Web Mercator sphere radius.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Convert Web Mercator X (meters) to longitude (degrees)
#[inline]
pub fn mercator_x_to_lon(x: f64) -> f64 {
    (x / EARTH_RADIUS).to_degrees()
}

/// Convert Web Mercator Y (meters) to latitude (degrees)
#[inline]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    let y_normalized = y / EARTH_RADIUS;
    (2.0 * y_normalized.exp().atan() - std::f64::consts::PI / 2.0).to_degrees()
}

/// Convert longitude (degrees) to Web Mercator X (meters)
#[inline]
pub fn lon_to_mercator_x(lon: f64) -> f64 {
    lon.to_radians() * EARTH_RADIUS
}

/// Convert latitude (degrees) to Web Mercator Y (meters), clamped to the valid range
#[inline]
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    ((std::f64::consts::PI / 4.0) + (lat_rad / 2.0)).tan().ln() * EARTH_RADIUS
}

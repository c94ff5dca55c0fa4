use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GeoError;

/// Spherical Earth radius used by the projection (meters, WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;
/// Latitude limit of the square Web Mercator world (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;
/// WGS84 first eccentricity squared.
pub const ECC2: f64 = 0.006_694_380_015_894_481;

/// Geographic coordinate in degrees.
///
/// Construct through [`LatLon::new`] to get range checking up front. Values
/// built from a struct literal are checked again by every projection entry
/// point via [`LatLon::validate`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        let coord = Self { lat, lon };
        coord.validate()?;
        Ok(coord)
    }

    /// Checks latitude in [-90, 90] and longitude in [-180, 180].
    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }

    /// Component-wise comparison with an absolute tolerance in degrees.
    pub fn approx_eq(&self, other: &Self, eps_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= eps_deg && (self.lon - other.lon).abs() <= eps_deg
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Error parsing a `"lat,lon"` pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseLatLonError {
    #[error("expected \"lat,lon\", got {0:?}")]
    Format(String),
    #[error(transparent)]
    Range(#[from] GeoError),
}

impl FromStr for LatLon {
    type Err = ParseLatLonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| ParseLatLonError::Format(s.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ParseLatLonError::Format(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| ParseLatLonError::Format(s.to_string()))?;
        Ok(LatLon::new(lat, lon)?)
    }
}

/// Slack allowed past the antimeridian before a longitude is wrapped.
const ANTIMERIDIAN_EPS: f64 = 1e-9;

/// Wraps a longitude into [-180, 180], leaving in-range values untouched.
///
/// Values within rounding noise of +/-180 are clamped instead of wrapped so
/// an inverse projection of the world edge stays on the same side.
pub fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0 - ANTIMERIDIAN_EPS..=180.0 + ANTIMERIDIAN_EPS).contains(&lon) {
        lon.clamp(-180.0, 180.0)
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Great-circle distance in meters on a sphere of [`EARTH_RADIUS`].
///
/// The cheap variant uses the spherical law of cosines; the accurate variant
/// uses the haversine formula, which stays well-conditioned for short
/// distances.
pub fn distance(a: LatLon, b: LatLon, accurate: bool) -> Result<f64, GeoError> {
    a.validate()?;
    b.validate()?;

    let lat1 = a.lat_rad();
    let lat2 = b.lat_rad();

    if !accurate {
        let cos_c = lat1.sin() * lat2.sin()
            + lat1.cos() * lat2.cos() * (b.lon_rad() - a.lon_rad()).cos();
        return Ok(EARTH_RADIUS * cos_c.clamp(-1.0, 1.0).acos());
    }

    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlon = (b.lon_rad() - a.lon_rad()) / 2.0;
    let h = half_dlat.sin() * half_dlat.sin()
        + lat1.cos() * lat2.cos() * half_dlon.sin() * half_dlon.sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    Ok(EARTH_RADIUS * c)
}

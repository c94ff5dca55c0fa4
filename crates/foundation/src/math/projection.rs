//! Spherical Web Mercator projection and scale conversions.
//!
//! Two flavours of flat point live here:
//! - `project` / `unproject` work in raw Mercator space (y grows north).
//! - `lat_lon_to_point` / `point_to_lat_lon` flip y so north maps onto the
//!   scene's negative z axis. Everything outside this module uses these.

use serde::{Deserialize, Serialize};

use super::{EARTH_RADIUS, ECC2, GeoError, LatLon, MAX_LATITUDE, Point, wrap_longitude};

/// Edge length of one map tile in pixels; world scale at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Raw spherical Mercator forward projection. Latitude is clamped to
/// [`MAX_LATITUDE`].
pub fn project(coord: LatLon) -> Result<Point, GeoError> {
    coord.validate()?;

    let lat = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let sin = lat.sin();
    let y = EARTH_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    Ok(Point::new(EARTH_RADIUS * coord.lon_rad(), y))
}

/// Raw spherical Mercator inverse projection.
pub fn unproject(point: Point) -> LatLon {
    let lat = 2.0 * (point.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;
    let lon = (point.x / EARTH_RADIUS).to_degrees();
    LatLon {
        lat: lat.to_degrees(),
        lon: wrap_longitude(lon),
    }
}

/// Geographic coordinate to flat point (y pointing south).
pub fn lat_lon_to_point(coord: LatLon) -> Result<Point, GeoError> {
    let projected = project(coord)?;
    Ok(Point::new(projected.x, -projected.y))
}

/// Flat point (y pointing south) to geographic coordinate.
///
/// Non-finite input yields a non-finite coordinate; use
/// [`try_point_to_lat_lon`] where the point comes from outside.
pub fn point_to_lat_lon(point: Point) -> LatLon {
    unproject(Point::new(point.x, -point.y))
}

/// [`unproject`] that fails on a non-finite point.
pub fn try_unproject(point: Point) -> Result<LatLon, GeoError> {
    let coord = unproject(point);
    if !point.is_finite() {
        return Err(GeoError::InvalidCoordinate {
            lat: coord.lat,
            lon: coord.lon,
        });
    }
    Ok(coord)
}

/// [`point_to_lat_lon`] that fails on a non-finite point.
pub fn try_point_to_lat_lon(point: Point) -> Result<LatLon, GeoError> {
    try_unproject(Point::new(point.x, -point.y))
}

/// Local distortion of the projection at a coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointScale {
    pub east_west: f64,
    pub north_south: f64,
}

impl PointScale {
    pub fn uniform(k: f64) -> Self {
        Self {
            east_west: k,
            north_south: k,
        }
    }
}

/// Scale factor of the projection at `coord`.
///
/// The cheap variant is the spherical `1 / cos(lat)` for both axes. The
/// accurate variant accounts for the WGS84 ellipsoid's meridian and
/// prime-vertical radii of curvature. Latitude is clamped to
/// [`MAX_LATITUDE`] like the projection itself.
pub fn point_scale(coord: LatLon, accurate: bool) -> Result<PointScale, GeoError> {
    coord.validate()?;

    let lat = coord.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let cos_lat = lat.cos();

    if !accurate {
        return Ok(PointScale::uniform(1.0 / cos_lat));
    }

    let a = EARTH_RADIUS;
    let sin_lat = lat.sin();
    let w2 = 1.0 - ECC2 * sin_lat * sin_lat;
    let meridian = a * (1.0 - ECC2) / w2.powf(1.5);
    let prime_vertical = a / w2.sqrt();

    Ok(PointScale {
        east_west: (a / prime_vertical) / cos_lat,
        north_south: (a / meridian) / cos_lat,
    })
}

/// Multiplier from projected units to world units at a zoom level.
///
/// `None` keeps projected units as-is, which is what a scene placed directly
/// in Mercator meters wants.
pub fn world_scale(zoom: Option<u32>) -> f64 {
    match zoom {
        Some(z) => TILE_SIZE * 2f64.powi(z as i32),
        None => 1.0,
    }
}

/// Inverse of [`world_scale`] for a zoomed scale.
pub fn zoom_for_scale(scale: f64) -> f64 {
    (scale / TILE_SIZE).log2()
}

pub fn metres_to_projected(metres: f64, scale: PointScale) -> f64 {
    metres * scale.north_south
}

pub fn projected_to_metres(projected: f64, scale: PointScale) -> f64 {
    projected / scale.north_south
}

/// Real-world meters to world units.
pub fn metres_to_world(metres: f64, scale: PointScale, zoom: Option<u32>) -> f64 {
    metres_to_projected(metres, scale) * world_scale(zoom)
}

/// World units to real-world meters.
pub fn world_to_metres(world: f64, scale: PointScale, zoom: Option<u32>) -> f64 {
    projected_to_metres(world / world_scale(zoom), scale)
}

#[cfg(test)]
mod tests {
    use super::{
        PointScale, TILE_SIZE, lat_lon_to_point, metres_to_world, point_scale,
        point_to_lat_lon, project, try_point_to_lat_lon, try_unproject, unproject, world_scale,
        world_to_metres, zoom_for_scale,
    };
    use crate::math::{EARTH_RADIUS, GeoError, LatLon, MAX_LATITUDE, Point};
    use proptest::prelude::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn ll(lat: f64, lon: f64) -> LatLon {
        LatLon::new(lat, lon).unwrap()
    }

    #[test]
    fn null_island_projects_to_zero() {
        let p = lat_lon_to_point(ll(0.0, 0.0)).unwrap();
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
    }

    #[test]
    fn world_edges_are_half_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS;
        let east = project(ll(0.0, 180.0)).unwrap();
        assert_close(east.x, half, 1e-6);

        let north = project(ll(MAX_LATITUDE, 0.0)).unwrap();
        assert_close(north.y, half, 1.0);
    }

    #[test]
    fn north_maps_to_negative_y() {
        let p = lat_lon_to_point(ll(55.75222, 37.61556)).unwrap();
        assert!(p.x > 0.0);
        assert!(p.y < 0.0);

        let raw = project(ll(55.75222, 37.61556)).unwrap();
        assert_eq!(p, Point::new(raw.x, -raw.y));
    }

    #[test]
    fn latitude_is_clamped_to_mercator_limit() {
        let clamped = lat_lon_to_point(ll(89.0, 10.0)).unwrap();
        let limit = lat_lon_to_point(ll(MAX_LATITUDE, 10.0)).unwrap();
        assert_eq!(clamped, limit);
        assert!(clamped.is_finite());
    }

    #[test]
    fn rejects_invalid_coordinates() {
        let err = lat_lon_to_point(LatLon {
            lat: -91.0,
            lon: 0.0,
        })
        .unwrap_err();
        assert_eq!(
            err,
            GeoError::InvalidCoordinate {
                lat: -91.0,
                lon: 0.0
            }
        );
        assert!(point_scale(LatLon { lat: 0.0, lon: 200.0 }, false).is_err());
    }

    #[test]
    fn unproject_wraps_longitude_past_antimeridian() {
        let p = Point::new(std::f64::consts::PI * EARTH_RADIUS * 1.5, 0.0);
        let c = unproject(p);
        assert_close(c.lon, -90.0, 1e-9);
    }

    #[test]
    fn checked_inverse_rejects_non_finite_points() {
        assert!(matches!(
            try_point_to_lat_lon(Point::new(f64::INFINITY, 0.0)),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(try_point_to_lat_lon(Point::new(0.0, f64::NAN)).is_err());
        assert!(try_unproject(Point::new(0.0, f64::NEG_INFINITY)).is_err());

        let p = lat_lon_to_point(ll(-33.5, 151.25)).unwrap();
        assert_eq!(try_point_to_lat_lon(p).unwrap(), point_to_lat_lon(p));
    }

    #[test]
    fn cheap_scale_at_equator_is_one() {
        let s = point_scale(ll(0.0, 0.0), false).unwrap();
        assert_eq!(s, PointScale::uniform(1.0));
    }

    #[test]
    fn cheap_scale_at_sixty_degrees_is_two() {
        let s = point_scale(ll(60.0, 0.0), false).unwrap();
        assert_close(s.east_west, 2.0, 1e-12);
        assert_close(s.north_south, 2.0, 1e-12);
    }

    #[test]
    fn accurate_scale_is_close_to_cheap_scale() {
        let cheap = point_scale(ll(55.75222, 37.61556), false).unwrap();
        let accurate = point_scale(ll(55.75222, 37.61556), true).unwrap();
        assert!((accurate.north_south / cheap.north_south - 1.0).abs() < 0.01);
        assert!((accurate.east_west / cheap.east_west - 1.0).abs() < 0.01);
        assert_ne!(accurate.east_west, accurate.north_south);
    }

    #[test]
    fn world_scale_doubles_per_zoom() {
        assert_eq!(world_scale(None), 1.0);
        assert_eq!(world_scale(Some(0)), TILE_SIZE);
        assert_eq!(world_scale(Some(3)), TILE_SIZE * 8.0);
        assert_close(zoom_for_scale(world_scale(Some(17))), 17.0, 1e-12);
    }

    #[test]
    fn metres_to_world_applies_north_south_scale() {
        let scale = PointScale {
            east_west: 1.5,
            north_south: 2.0,
        };
        assert_eq!(metres_to_world(10.0, scale, None), 20.0);
        assert_eq!(metres_to_world(10.0, scale, Some(1)), 20.0 * 512.0);
        assert_eq!(world_to_metres(20.0, scale, None), 10.0);
    }

    proptest! {
        #[test]
        fn forward_inverse_round_trip(
            lat in -MAX_LATITUDE..MAX_LATITUDE,
            lon in -180.0f64..=180.0,
        ) {
            let c = ll(lat, lon);
            let back = point_to_lat_lon(lat_lon_to_point(c).unwrap());
            prop_assert!(back.approx_eq(&c, 1e-6), "{c:?} -> {back:?}");
        }

        #[test]
        fn point_scale_grows_toward_poles(
            lat in 0.0f64..84.0,
            step in 0.01f64..1.0,
            lon in -180.0f64..180.0,
            accurate in any::<bool>(),
        ) {
            let lower = point_scale(ll(lat, lon), accurate).unwrap();
            let upper = point_scale(ll(lat + step, lon), accurate).unwrap();
            prop_assert!(upper.east_west > lower.east_west);
            prop_assert!(upper.north_south > lower.north_south);

            let mirrored = point_scale(ll(-lat, lon), accurate).unwrap();
            prop_assert!((mirrored.east_west - lower.east_west).abs() <= 1e-12 * lower.east_west);
            prop_assert!(
                (mirrored.north_south - lower.north_south).abs() <= 1e-12 * lower.north_south
            );
        }

        #[test]
        fn metres_world_round_trip(
            metres in 0.0f64..1.0e7,
            k in 1.0e-3f64..1.0e3,
            zoom in 0u32..24,
        ) {
            let scale = PointScale::uniform(k);
            let world = metres_to_world(metres, scale, Some(zoom));
            let back = world_to_metres(world, scale, Some(zoom));
            let tolerance = 1e-9 * metres.max(f64::MIN_POSITIVE);
            prop_assert!((back - metres).abs() <= tolerance, "{metres} -> {back}");
        }
    }
}

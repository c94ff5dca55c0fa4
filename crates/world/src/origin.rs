//! Fixed origin of the local frame.
//!
//! The scene's (0, 0) is pinned to one geographic coordinate for the whole
//! session. Moving it would shift the meaning of every point already placed,
//! so it is set once and then only read.

use foundation::math::{LatLon, Point, lat_lon_to_point, try_point_to_lat_lon};
use serde::Serialize;
use tracing::info;

use crate::error::WorldError;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Origin {
    pub lat_lon: LatLon,
    /// Forward projection of `lat_lon`, computed once.
    pub point: Point,
}

#[derive(Debug, Default)]
pub struct OriginManager {
    origin: Option<Origin>,
}

impl OriginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub fn is_set(&self) -> bool {
        self.origin.is_some()
    }

    /// Pins the local frame to `coord`. Fails if an origin already exists;
    /// the stored origin is left untouched in that case.
    pub fn set_origin(&mut self, coord: LatLon) -> Result<Origin, WorldError> {
        if self.origin.is_some() {
            return Err(WorldError::OriginAlreadySet);
        }

        let origin = Origin {
            lat_lon: coord,
            point: lat_lon_to_point(coord)?,
        };
        info!(lat = coord.lat, lon = coord.lon, "origin set");
        self.origin = Some(origin);
        Ok(origin)
    }

    /// Geographic coordinate to a point relative to the origin.
    pub fn to_local_point(&self, coord: LatLon) -> Result<Point, WorldError> {
        let origin = self.origin.ok_or(WorldError::OriginNotSet)?;
        Ok(lat_lon_to_point(coord)? - origin.point)
    }

    /// Point relative to the origin to a geographic coordinate. Non-finite
    /// points are rejected.
    pub fn to_geographic(&self, point: Point) -> Result<LatLon, WorldError> {
        let origin = self.origin.ok_or(WorldError::OriginNotSet)?;
        Ok(try_point_to_lat_lon(point + origin.point)?)
    }
}

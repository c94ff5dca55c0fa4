//! Command implementations behind the `vizi` binary.
//!
//! Every command returns a serializable report; the binary only parses
//! arguments and prints JSON.

use foundation::math::{self, LatLon, Point, PointScale, Vec3};
use serde::Serialize;
use tracing::info;
use world::{Layer, LayerError, LayerId, OriginManager, World, WorldEvent, WorldOptions};

/// Red Square, the default origin for local conversions and sessions.
pub const MOSCOW: &str = "55.75222,37.61556";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projected {
    pub coord: LatLon,
    /// Scene-space point (y south).
    pub point: Point,
    /// Raw Mercator point (y north).
    pub raw: Point,
}

pub fn project(coord: LatLon) -> Result<Projected, String> {
    Ok(Projected {
        coord,
        point: math::lat_lon_to_point(coord).map_err(|e| e.to_string())?,
        raw: math::project(coord).map_err(|e| e.to_string())?,
    })
}

pub fn unproject(point: Point) -> Result<LatLon, String> {
    math::try_point_to_lat_lon(point).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalReport {
    pub origin: LatLon,
    pub coord: LatLon,
    pub point: Point,
    /// Distance from the origin in local units.
    pub offset: f64,
    pub round_trip: LatLon,
}

pub fn local(origin: LatLon, coord: LatLon) -> Result<LocalReport, String> {
    let mut manager = OriginManager::new();
    manager.set_origin(origin).map_err(|e| e.to_string())?;
    let point = manager.to_local_point(coord).map_err(|e| e.to_string())?;
    let round_trip = manager.to_geographic(point).map_err(|e| e.to_string())?;
    Ok(LocalReport {
        origin,
        coord,
        point,
        offset: point.distance_to(Point::ZERO),
        round_trip,
    })
}

pub fn scale(coord: LatLon, accurate: bool) -> Result<PointScale, String> {
    math::point_scale(coord, accurate).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetresReport {
    pub metres: f64,
    pub at: LatLon,
    pub zoom: Option<u32>,
    pub scale: PointScale,
    pub world: f64,
}

pub fn metres(
    metres: f64,
    at: LatLon,
    zoom: Option<u32>,
    accurate: bool,
) -> Result<MetresReport, String> {
    if !metres.is_finite() {
        return Err(format!("metres must be finite, got {metres}"));
    }
    let scale = scale(at, accurate)?;
    Ok(MetresReport {
        metres,
        at,
        zoom,
        scale,
        world: math::metres_to_world(metres, scale, zoom),
    })
}

pub fn distance(a: LatLon, b: LatLon, accurate: bool) -> Result<f64, String> {
    math::distance(a, b, accurate).map_err(|e| e.to_string())
}

/// A pin placed at a geographic coordinate.
#[derive(Debug)]
pub struct MarkerLayer {
    id: LayerId,
    at: LatLon,
    point: Option<Point>,
}

impl MarkerLayer {
    pub fn new(id: u64, at: LatLon) -> Self {
        Self {
            id: LayerId(id),
            at,
            point: None,
        }
    }

    /// Local-frame position, known once the layer has been added.
    pub fn point(&self) -> Option<Point> {
        self.point
    }
}

impl Layer for MarkerLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn attribution(&self) -> Option<&str> {
        Some("vizi markers")
    }

    fn on_add(&mut self, origin: &OriginManager) -> Result<(), LayerError> {
        let point = origin
            .to_local_point(self.at)
            .map_err(|e| LayerError::new(e.to_string()))?;
        self.point = Some(point);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub event: WorldEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub origin: LatLon,
    pub position: Option<LatLon>,
    pub attribution: String,
    pub frames: u64,
    pub events: Vec<SessionEvent>,
}

/// Scripted session: pin the origin, drop a marker on every target, move the
/// camera to each target in turn (one frame per move), then tear down.
pub fn session(
    options: WorldOptions,
    origin: LatLon,
    targets: &[LatLon],
    dt_s: f64,
) -> Result<SessionReport, String> {
    let mut world = World::new(options);
    world.set_view(origin).map_err(|e| e.to_string())?;

    for (i, target) in targets.iter().enumerate() {
        world
            .add_layer(Box::new(MarkerLayer::new(i as u64 + 1, *target)))
            .map_err(|e| e.to_string())?;
    }

    let mut frames = 0;
    for target in targets {
        let point = world.lat_lon_to_point(*target).map_err(|e| e.to_string())?;
        world
            .on_controls_move_end(Vec3::from_ground(point, 0.0))
            .map_err(|e| e.to_string())?;
        if world.update(dt_s).is_some() {
            frames += 1;
        }
    }

    let position = world.position();
    let attribution = world.attributions().footer();
    world.destroy();

    let events = world
        .drain_events()
        .into_iter()
        .map(|r| SessionEvent {
            frame: r.frame_index,
            event: r.event,
        })
        .collect::<Vec<_>>();
    info!(frames, events = events.len(), "session finished");

    Ok(SessionReport {
        origin,
        position,
        attribution,
        frames,
        events,
    })
}

#[cfg(test)]
mod tests {
    use foundation::math::{LatLon, Point};
    use pretty_assertions::assert_eq;
    use world::{WorldEvent, WorldOptions};

    use super::*;

    fn ll(s: &str) -> LatLon {
        s.parse().unwrap()
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} vs {b} (eps {eps})");
    }

    #[test]
    fn project_reports_both_flavours() {
        let out = project(ll(MOSCOW)).unwrap();
        assert_close(out.point.x, 4_187_344.985, 1e-2);
        assert_close(out.point.y, -7_509_246.967, 1e-2);
        assert_eq!(out.raw, Point::new(out.point.x, -out.point.y));
    }

    #[test]
    fn unproject_rejects_nan() {
        assert!(unproject(Point::new(f64::NAN, 0.0)).is_err());
        let back = unproject(project(ll(MOSCOW)).unwrap().point).unwrap();
        assert!(back.approx_eq(&ll(MOSCOW), 1e-9));
    }

    #[test]
    fn local_offsets_from_origin() {
        let report = local(ll(MOSCOW), ll("55.76,37.62")).unwrap();
        assert_close(report.point.x, 494.0, 1.0);
        assert_close(report.point.y, -1539.0, 1.0);
        assert_close(report.offset, 1616.0, 1.0);
        assert!(report.round_trip.approx_eq(&ll("55.76,37.62"), 1e-6));
    }

    #[test]
    fn metres_at_equator_are_projection_units() {
        let report = metres(100.0, ll("0,0"), None, false).unwrap();
        assert_close(report.world, 100.0, 1e-9);
        let zoomed = metres(100.0, ll("0,0"), Some(1), false).unwrap();
        assert_close(zoomed.world, 51_200.0, 1e-6);
    }

    #[test]
    fn distance_between_close_points() {
        let d = distance(ll(MOSCOW), ll("55.76,37.62"), true).unwrap();
        assert_close(d, 909.0, 10.0);
    }

    #[test]
    fn session_moves_through_targets() {
        let targets = [ll("55.76,37.62"), ll("55.74,37.60")];
        let report = session(WorldOptions::default(), ll(MOSCOW), &targets, 0.5).unwrap();

        assert_eq!(report.frames, 2);
        assert_eq!(report.attribution, "vizi markers | vizi markers");
        assert!(report.position.unwrap().approx_eq(&targets[1], 1e-6));

        let moves: Vec<LatLon> = report
            .events
            .iter()
            .filter_map(|e| match e.event {
                WorldEvent::Move { lat_lon, .. } => Some(lat_lon),
                _ => None,
            })
            .collect();
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[0], ll(MOSCOW));

        let last = report.events.last().unwrap();
        assert_eq!(last.event, WorldEvent::LayerRemoved { id: LayerId(2) });
    }

    #[test]
    fn session_event_serializes_flat() {
        let event = SessionEvent {
            frame: 3,
            event: WorldEvent::MoveStart,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"frame":3,"kind":"move_start"}"#
        );
    }
}

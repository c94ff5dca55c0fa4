use foundation::math::{LatLon, Point};
use runtime::EventKind;
use serde::Serialize;

use crate::controls::ControlsId;
use crate::layer::LayerId;

/// Everything a [`World`](crate::World) tells its observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorldEvent {
    PreResetView,
    MoveStart,
    Move { lat_lon: LatLon, point: Point },
    MoveEnd,
    PostResetView,
    PreUpdate { dt_s: f64 },
    PostUpdate { dt_s: f64 },
    LayerAdded { id: LayerId },
    LayerRemoved { id: LayerId },
    ControlsAdded { id: ControlsId },
    ControlsRemoved { id: ControlsId },
}

impl EventKind for WorldEvent {
    fn kind(&self) -> &'static str {
        match self {
            WorldEvent::PreResetView => "pre_reset_view",
            WorldEvent::MoveStart => "move_start",
            WorldEvent::Move { .. } => "move",
            WorldEvent::MoveEnd => "move_end",
            WorldEvent::PostResetView => "post_reset_view",
            WorldEvent::PreUpdate { .. } => "pre_update",
            WorldEvent::PostUpdate { .. } => "post_update",
            WorldEvent::LayerAdded { .. } => "layer_added",
            WorldEvent::LayerRemoved { .. } => "layer_removed",
            WorldEvent::ControlsAdded { .. } => "controls_added",
            WorldEvent::ControlsRemoved { .. } => "controls_removed",
        }
    }
}

impl WorldEvent {
    /// True for the five notifications a view change produces.
    pub fn is_view_change(&self) -> bool {
        matches!(
            self,
            WorldEvent::PreResetView
                | WorldEvent::MoveStart
                | WorldEvent::Move { .. }
                | WorldEvent::MoveEnd
                | WorldEvent::PostResetView
        )
    }
}

#[cfg(test)]
mod tests {
    use foundation::math::{LatLon, Point};
    use runtime::EventKind;

    use super::WorldEvent;
    use crate::layer::LayerId;

    #[test]
    fn serialized_tag_matches_kind() {
        let events = [
            WorldEvent::MoveStart,
            WorldEvent::Move {
                lat_lon: LatLon::new(1.0, 2.0).unwrap(),
                point: Point::new(3.0, 4.0),
            },
            WorldEvent::PreUpdate { dt_s: 0.5 },
            WorldEvent::LayerAdded { id: LayerId(9) },
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["kind"], event.kind());
        }
    }

    #[test]
    fn move_payload_serializes_flat() {
        let event = WorldEvent::Move {
            lat_lon: LatLon::new(55.0, 37.0).unwrap(),
            point: Point::new(-1.0, 2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"move","lat_lon":{"lat":55.0,"lon":37.0},"point":{"x":-1.0,"y":2.0}}"#
        );
    }

    #[test]
    fn view_change_classification() {
        assert!(WorldEvent::MoveEnd.is_view_change());
        assert!(!WorldEvent::PostUpdate { dt_s: 0.0 }.is_view_change());
    }
}

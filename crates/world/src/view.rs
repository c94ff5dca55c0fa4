use foundation::math::{LatLon, Point};
use runtime::{EventBus, Frame};

use crate::events::WorldEvent;

/// Where the orchestrator is in a move sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MovePhase {
    #[default]
    Idle,
    MovingStart,
    Moving,
    MovingEnd,
}

/// How a view change was initiated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveKind {
    /// The view is replaced as a whole; observers get pre/post reset
    /// notifications around the move.
    Reset,
    /// Incremental movement; only the move notifications are sent.
    Drag,
}

/// Sequences move notifications and remembers the last position.
#[derive(Debug, Default)]
pub struct ViewOrchestrator {
    phase: MovePhase,
    last_position: Option<LatLon>,
}

impl ViewOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MovePhase {
        self.phase
    }

    pub fn position(&self) -> Option<LatLon> {
        self.last_position
    }

    /// Runs one full `Idle -> MovingStart -> Moving -> MovingEnd -> Idle`
    /// cycle, emitting into `bus`.
    pub fn apply(
        &mut self,
        kind: MoveKind,
        lat_lon: LatLon,
        point: Point,
        frame: Frame,
        bus: &mut EventBus<WorldEvent>,
    ) {
        debug_assert_eq!(self.phase, MovePhase::Idle);

        if kind == MoveKind::Reset {
            bus.emit(frame, WorldEvent::PreResetView);
        }

        self.phase = MovePhase::MovingStart;
        bus.emit(frame, WorldEvent::MoveStart);

        self.phase = MovePhase::Moving;
        self.last_position = Some(lat_lon);
        bus.emit(frame, WorldEvent::Move { lat_lon, point });

        self.phase = MovePhase::MovingEnd;
        bus.emit(frame, WorldEvent::MoveEnd);

        self.phase = MovePhase::Idle;

        if kind == MoveKind::Reset {
            bus.emit(frame, WorldEvent::PostResetView);
        }
    }
}

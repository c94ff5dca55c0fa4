use foundation::math::Vec3;
use serde::Serialize;

use crate::origin::OriginManager;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ControlsId(pub u64);

/// What a camera control reports after a frame's update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlsMotion {
    /// The camera target is still moving.
    Dragging(Vec3),
    /// A gesture finished with the camera target at this scene position.
    MoveEnd(Vec3),
}

/// Camera input driver (orbit, fly, ...).
pub trait Controls {
    fn id(&self) -> ControlsId;

    fn on_add(&mut self, _origin: &OriginManager) {}

    /// Advances the control by `dt_s` seconds.
    fn update(&mut self, dt_s: f64) -> Option<ControlsMotion>;

    fn destroy(&mut self) {}
}

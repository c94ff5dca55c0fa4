use std::fmt;

use serde::Serialize;

use crate::error::LayerError;
use crate::origin::OriginManager;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(pub u64);

/// Something placed into the world: tiles, vector features, environment.
///
/// Layers get read access to the origin when they are added so they can
/// convert their geographic data into the local frame.
pub trait Layer {
    fn id(&self) -> LayerId;

    /// Attribution text to show while the layer is present.
    fn attribution(&self) -> Option<&str> {
        None
    }

    fn on_add(&mut self, origin: &OriginManager) -> Result<(), LayerError>;

    /// Releases everything the layer holds. Called by
    /// [`World::destroy`](crate::World::destroy).
    fn destroy(&mut self) {}
}

/// Lifecycle of a registered layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LayerStatus {
    Pending,
    Ready,
    Failed(String),
}

pub(crate) struct LayerEntry {
    pub layer: Box<dyn Layer>,
    pub status: LayerStatus,
}

impl fmt::Debug for LayerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerEntry")
            .field("id", &self.layer.id())
            .field("status", &self.status)
            .finish()
    }
}

use runtime::DEFAULT_LOG_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Session options. Unknown keys are rejected so typos surface early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldOptions {
    /// Render a skybox environment instead of a flat background. The world
    /// only carries this flag; environment layers and the host renderer read
    /// it through [`World::options`](crate::World::options).
    pub skybox: bool,
    /// Enable the renderer's post-processing pass. Carried like `skybox`.
    pub post_processing: bool,
    /// World-wide attribution recorded for every added layer.
    pub attribution: Option<String>,
    /// Most events kept in the world's event log. Zero keeps none, leaving
    /// subscriptions as the only way to observe events.
    pub event_log_capacity: usize,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            skybox: false,
            post_processing: false,
            attribution: None,
            event_log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl WorldOptions {
    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(text)?)
    }
}

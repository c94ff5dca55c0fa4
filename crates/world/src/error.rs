use foundation::math::GeoError;
use thiserror::Error;

use crate::controls::ControlsId;
use crate::layer::LayerId;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("origin not set; call set_view first")]
    OriginNotSet,

    #[error("origin already set; the local frame cannot be moved")]
    OriginAlreadySet,

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("layer {id:?} failed to initialise: {reason}")]
    LayerFailed { id: LayerId, reason: String },

    #[error("layer {0:?} is already registered")]
    DuplicateLayer(LayerId),

    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),

    #[error("unknown controls {0:?}")]
    UnknownControls(ControlsId),

    #[error("world has been destroyed")]
    Destroyed,

    #[error("invalid world options: {0}")]
    Config(#[from] serde_json::Error),
}

/// Reason a layer refused to initialise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LayerError(pub String);

impl LayerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

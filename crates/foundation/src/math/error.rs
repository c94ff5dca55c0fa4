use thiserror::Error;

/// Errors raised by the pure projection functions.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or a
    /// non-finite component.
    #[error("invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

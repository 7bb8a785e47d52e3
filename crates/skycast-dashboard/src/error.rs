//! Dashboard-level error type.

use skycast_weather::{LocationError, PersistenceError, WeatherError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("No location matched '{0}'")]
    NotFound(String),

    #[error("Weather request failed: {0}")]
    Transport(#[from] WeatherError),

    #[error("No location selected")]
    NoSelection,

    #[error("No favorite at position {0}")]
    NoSuchFavorite(usize),

    #[error("Coordinates out of range: {lat}, {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Favorites storage failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<LocationError> for DashboardError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::EmptyQuery => Self::EmptyQuery,
            LocationError::Transport(e) => Self::Transport(e),
        }
    }
}

impl DashboardError {
    /// Retrying the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_transport_failure())
    }
}

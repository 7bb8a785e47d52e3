//! Weather-specific error types.

use thiserror::Error;

/// Errors from the weather and geocoding HTTP endpoints.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request URL is stripped; it carries the API key.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No API key configured")]
    MissingApiKey,
}

impl WeatherError {
    /// Non-2xx or network-level failure. The caller may retry.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. } | Self::Parse(_))
    }

    /// HTTP status code reported by the provider, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

/// Errors from resolving a free-text location query.
///
/// "Nothing matched" is not an error; it is `Ok(None)`.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error(transparent)]
    Transport(#[from] WeatherError),
}

/// Errors from reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

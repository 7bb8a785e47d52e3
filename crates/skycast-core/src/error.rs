//! Centralized error types for the Skycast application.
//!
//! Every error that reaches the user is convertible to [`AppError`], whose
//! `user_message()` is suitable for display. Full context stays in the
//! `Display` impl for logging.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }

    /// Whether retrying the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Network(NetworkError::ServerError { status, .. }) => {
                *status >= 500 || *status == 429
            }
            AppError::Network(_) => true,
            _ => false,
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Local storage errors (favorites slot).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read stored data: {0}")]
    ReadFailed(String),

    #[error("Failed to write stored data: {0}")]
    WriteFailed(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Saved favorites could not be read.",
            StorageError::WriteFailed(_) => {
                "Favorites could not be saved. Changes apply to this session only."
            }
            StorageError::Unavailable(_) => {
                "Local storage is unavailable. Favorites will not be kept."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }

    /// Classify a failure from [`crate::Config::load_validated`].
    ///
    /// TOML syntax and type errors become `ParseError`; everything else,
    /// including failed validation, is `Invalid`.
    pub fn from_load_error(err: &anyhow::Error) -> Self {
        let detail = format!("{:#}", err);
        if err.chain().any(|cause| cause.is::<toml::de::Error>()) {
            ConfigError::ParseError(detail)
        } else {
            ConfigError::Invalid(detail)
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Empty search query")]
    EmptyQuery,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Missing API key")]
    MissingApiKey,

    #[error("No location selected")]
    NoSelection,

    #[error("No favorite at position {0}")]
    NoSuchFavorite(usize),

    #[error("Coordinates out of range: {lat}, {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => {
                "Could not find the location you searched for. Please try another search."
            }
            WeatherError::EmptyQuery => "Please enter a city name.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::MissingApiKey => "No weather API key configured. Check settings.",
            WeatherError::NoSelection => "Search for a city or pick a favorite first.",
            WeatherError::NoSuchFavorite(_) => "That favorite does not exist.",
            WeatherError::InvalidCoordinates { .. } => {
                "Latitude must be between -90 and 90 and longitude between -180 and 180."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        let err = self.without_url();
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::ConnectionFailed(err.to_string())
        } else if let Some(status) = err.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            NetworkError::InvalidResponse(err.to_string())
        } else {
            NetworkError::ConnectionFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let messages = [
            AppError::from(NetworkError::Timeout).user_message(),
            AppError::from(StorageError::WriteFailed("disk full".into())).user_message(),
            AppError::from(ConfigError::Invalid("test".into())).user_message(),
            AppError::from(WeatherError::InvalidCoordinates { lat: 91.0, lon: 0.0 }).user_message(),
            AppError::from(WeatherError::EmptyQuery).user_message(),
        ];

        for message in messages {
            assert!(!message.is_empty());
        }
    }

    #[test]
    fn test_not_found_is_distinct_from_transport() {
        let not_found = AppError::from(WeatherError::LocationNotFound("Atlantis".into()));
        let transport = AppError::from(NetworkError::ServerError {
            status: 500,
            message: "boom".into(),
        });
        assert_ne!(not_found.user_message(), transport.user_message());
        assert!(not_found.user_message().contains("another search"));
        assert!(!not_found.is_retryable());
        assert!(transport.is_retryable());
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let server = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert!(server.user_message().contains("later"));
        assert_ne!(server.user_message(), client.user_message());
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = StorageError::Unavailable("no home".into()).into();
        assert!(matches!(app_err, AppError::Storage(StorageError::Unavailable(_))));
        assert!(!app_err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let bad_request = AppError::from(NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        });
        let throttled = AppError::from(NetworkError::ServerError {
            status: 429,
            message: "slow down".into(),
        });
        assert!(!bad_request.is_retryable());
        assert!(throttled.is_retryable());
        assert!(AppError::from(NetworkError::Timeout).is_retryable());
    }

    #[test]
    fn test_invalid_coordinates_is_not_a_config_problem() {
        let app_err = AppError::from(WeatherError::InvalidCoordinates { lat: 123.0, lon: 0.0 });
        assert!(app_err.user_message().contains("Latitude"));
        assert!(!app_err.user_message().contains("settings"));
        assert!(app_err.to_string().contains("123"));
    }

    #[test]
    fn test_load_error_classification() {
        let toml_err = toml::from_str::<toml::Value>("weather = [").unwrap_err();
        let parse = anyhow::Error::new(toml_err).context("Failed to parse config file");
        assert!(matches!(
            ConfigError::from_load_error(&parse),
            ConfigError::ParseError(ref msg) if msg.contains("Failed to parse config file")
        ));

        let invalid = anyhow::anyhow!("Configuration validation failed: timeout");
        assert!(matches!(
            ConfigError::from_load_error(&invalid),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherError::EmptyQuery);
        assert_eq!(app_err.user_message(), "Please enter a city name.");
    }
}

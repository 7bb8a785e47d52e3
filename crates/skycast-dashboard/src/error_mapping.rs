//! Maps dashboard errors to skycast_core::AppError for user-facing messages.

use skycast_core::error::ReqwestErrorExt;
use skycast_core::{AppError, NetworkError, StorageError, WeatherError as CoreWeatherError};
use skycast_weather::{PersistenceError, WeatherError};

use crate::error::DashboardError;

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::EmptyQuery => AppError::Weather(CoreWeatherError::EmptyQuery),
            DashboardError::NotFound(query) => {
                AppError::Weather(CoreWeatherError::LocationNotFound(query))
            }
            DashboardError::Transport(e) => transport_error(e),
            DashboardError::NoSelection => AppError::Weather(CoreWeatherError::NoSelection),
            DashboardError::NoSuchFavorite(index) => {
                AppError::Weather(CoreWeatherError::NoSuchFavorite(index))
            }
            DashboardError::InvalidCoordinates { lat, lon } => {
                AppError::Weather(CoreWeatherError::InvalidCoordinates { lat, lon })
            }
            DashboardError::Persistence(e) => AppError::Storage(storage_error(e)),
        }
    }
}

fn transport_error(e: WeatherError) -> AppError {
    match e {
        WeatherError::Network(err) => AppError::Network(err.into_network_error()),
        WeatherError::Status { status: 401, .. } => {
            AppError::Weather(CoreWeatherError::InvalidApiKey)
        }
        WeatherError::Status { status, message } => {
            AppError::Network(NetworkError::ServerError { status, message })
        }
        WeatherError::Parse(message) => AppError::Network(NetworkError::InvalidResponse(message)),
        WeatherError::MissingApiKey => AppError::Weather(CoreWeatherError::MissingApiKey),
    }
}

fn storage_error(e: PersistenceError) -> StorageError {
    match e {
        PersistenceError::Read { .. } => StorageError::ReadFailed(e.to_string()),
        PersistenceError::Write { .. } | PersistenceError::Serialize(_) => {
            StorageError::WriteFailed(e.to_string())
        }
        PersistenceError::Unavailable(msg) => StorageError::Unavailable(msg),
    }
}

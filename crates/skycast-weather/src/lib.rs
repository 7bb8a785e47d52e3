//! Weather data for Skycast
//!
//! Location lookup and current/forecast retrieval against the
//! OpenWeatherMap API, daily forecast aggregation, and the persisted
//! favorites list.

pub mod error;
pub mod favorites;
pub mod forecast;
pub mod geocode;
mod http;
pub mod provider;
pub mod storage;
pub mod types;

pub use error::{LocationError, PersistenceError, WeatherError};
pub use favorites::{FavoritesSet, FavoritesStore};
pub use forecast::{aggregate, day_key, MAX_FORECAST_DAYS};
pub use geocode::{LocationResolver, CURRENT_LOCATION_NAME};
pub use provider::WeatherProvider;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::*;

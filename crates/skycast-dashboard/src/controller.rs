//! Dashboard controller: location lookup, weather fetches and favorites.
//!
//! The controller owns the view state. Callers drive it one action at a
//! time; a toggle is saved before the next action runs.

use std::time::Duration;

use skycast_core::Config;
use skycast_weather::{
    aggregate, FavoritesSet, FavoritesStore, FileStorage, ForecastResult, Location,
    LocationResolver, PersistenceError, Storage, WeatherProvider, WeatherSnapshot,
};

use crate::error::DashboardError;

/// What the dashboard is currently showing.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub loading: bool,
    pub current_location: Option<Location>,
    pub current_weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastResult>,
}

/// Result of adding or removing a favorite.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub location: Location,
    pub added: bool,
    /// Set when the new list could not be saved. The change still applies
    /// for this session.
    pub save_error: Option<PersistenceError>,
}

impl ToggleOutcome {
    pub fn persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

pub struct DashboardController<S: Storage> {
    resolver: LocationResolver,
    provider: WeatherProvider,
    store: FavoritesStore<S>,
    favorites: FavoritesSet,
    /// Set while the stored favorites could not be read. The slot is not
    /// overwritten until a read succeeds or the user clears it.
    load_error: Option<PersistenceError>,
    state: DashboardState,
}

impl DashboardController<FileStorage> {
    /// Build a controller from application config, storing favorites under
    /// the config directory.
    pub fn from_config(config: &Config) -> Result<Self, DashboardError> {
        let api_key = config.weather.resolved_api_key();
        let timeout = Duration::from_secs(config.weather.request_timeout_secs);

        let resolver =
            LocationResolver::with_options(&config.weather.geo_base_url, api_key.clone(), timeout)?;
        let provider =
            WeatherProvider::with_options(&config.weather.api_base_url, api_key, timeout)?;
        let store = FavoritesStore::with_key(
            FileStorage::new(config.data_dir()),
            config.favorites.storage_key.clone(),
        );

        Ok(Self::new(resolver, provider, store))
    }
}

impl<S: Storage> DashboardController<S> {
    /// Create a controller, loading saved favorites.
    ///
    /// A storage read failure starts the session with no favorites and is
    /// kept in [`Self::favorites_load_error`].
    pub fn new(
        resolver: LocationResolver,
        provider: WeatherProvider,
        store: FavoritesStore<S>,
    ) -> Self {
        let (favorites, load_error) = match store.try_load() {
            Ok(favorites) => (favorites, None),
            Err(e) => {
                tracing::warn!("Stored favorites unreadable, starting empty: {}", e);
                (FavoritesSet::new(), Some(e))
            }
        };
        tracing::info!("Dashboard ready with {} favorites", favorites.len());

        Self {
            resolver,
            provider,
            store,
            favorites,
            load_error,
            state: DashboardState::default(),
        }
    }

    /// Why the stored favorites could not be read, if they could not.
    pub fn favorites_load_error(&self) -> Option<&PersistenceError> {
        self.load_error.as_ref()
    }

    /// Read the stored favorites again, replacing the in-memory set.
    pub fn reload_favorites(&mut self) -> Result<(), DashboardError> {
        let favorites = self.store.try_load()?;
        self.favorites = favorites;
        self.load_error = None;
        Ok(())
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Resolve a city name without fetching any weather.
    pub async fn resolve(&self, query: &str) -> Result<Location, DashboardError> {
        self.resolver
            .resolve(query)
            .await?
            .ok_or_else(|| DashboardError::NotFound(query.trim().to_string()))
    }

    /// Name a device-reported position, rejecting out-of-range coordinates.
    pub fn device_location(lat: f64, lon: f64) -> Result<Location, DashboardError> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            Ok(LocationResolver::from_coordinates(lat, lon))
        } else {
            Err(DashboardError::InvalidCoordinates { lat, lon })
        }
    }

    /// Resolve a city name and show its weather.
    pub async fn search(&mut self, query: &str) -> Result<(), DashboardError> {
        let location = self.resolve(query).await?;
        self.show(location).await
    }

    /// Show weather for a device-reported position.
    pub async fn use_coordinates(&mut self, lat: f64, lon: f64) -> Result<(), DashboardError> {
        let location = Self::device_location(lat, lon)?;
        self.show(location).await
    }

    /// Select `location` and fetch its current weather and forecast.
    ///
    /// On failure the selection still changes; whatever was fetched before
    /// the failure is kept.
    pub async fn show(&mut self, location: Location) -> Result<(), DashboardError> {
        self.state.loading = true;
        self.state.current_location = Some(location.clone());

        let result = self.load_weather(&location).await;
        self.state.loading = false;

        if let Err(e) = &result {
            tracing::warn!("Failed to fetch weather for {}: {}", location, e);
        }
        result
    }

    /// Fetch again for the current selection.
    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        let location = self
            .state
            .current_location
            .clone()
            .ok_or(DashboardError::NoSelection)?;
        self.show(location).await
    }

    /// Show the favorite at `index` (zero-based).
    pub async fn select_favorite(&mut self, index: usize) -> Result<(), DashboardError> {
        let location = self
            .favorites
            .get(index)
            .cloned()
            .ok_or(DashboardError::NoSuchFavorite(index))?;
        self.show(location).await
    }

    pub fn is_favorite(&self, location: &Location) -> bool {
        self.favorites.contains(location)
    }

    pub fn is_current_favorite(&self) -> bool {
        self.state
            .current_location
            .as_ref()
            .is_some_and(|loc| self.favorites.contains(loc))
    }

    /// Add or remove `location` and save the new list.
    ///
    /// While the stored list is unreadable nothing is written, and the
    /// outcome reports the change as not persisted.
    pub fn toggle_favorite(&mut self, location: Location) -> ToggleOutcome {
        let (favorites, added) = self.favorites.toggle(location.clone());
        self.favorites = favorites;

        if added {
            tracing::info!("Added {} to favorites", location.name());
        } else {
            tracing::info!("Removed {} from favorites", location.name());
        }

        let save_error = match &self.load_error {
            Some(e) => Some(PersistenceError::Unavailable(format!(
                "stored favorites were not read, leaving them untouched ({})",
                e
            ))),
            None => self.store.save(&self.favorites).err(),
        };
        if let Some(e) = &save_error {
            tracing::warn!("Favorites not saved, keeping change for this session: {}", e);
        }

        ToggleOutcome {
            location,
            added,
            save_error,
        }
    }

    pub fn toggle_current_favorite(&mut self) -> Result<ToggleOutcome, DashboardError> {
        let location = self
            .state
            .current_location
            .clone()
            .ok_or(DashboardError::NoSelection)?;
        Ok(self.toggle_favorite(location))
    }

    /// Remove every favorite. The in-memory list is emptied even if the
    /// stored copy cannot be removed.
    pub fn clear_favorites(&mut self) -> Result<(), DashboardError> {
        self.favorites = FavoritesSet::new();
        self.store.clear()?;
        self.load_error = None;
        Ok(())
    }

    async fn load_weather(&mut self, location: &Location) -> Result<(), DashboardError> {
        let snapshot = self
            .provider
            .fetch_current(location.lat(), location.lon())
            .await?;
        self.state.current_weather = Some(snapshot);

        let samples = self
            .provider
            .fetch_forecast_samples(location.lat(), location.lon())
            .await?;
        self.state.forecast = Some(aggregate(&samples));

        Ok(())
    }
}

//! Favorite locations: an insertion-ordered set keyed by (name, lat, lon),
//! persisted as a JSON array in a single storage slot.

use serde::Serialize;

use crate::error::PersistenceError;
use crate::storage::Storage;
use crate::types::Location;

/// Default storage slot for the favorites list
pub const FAVORITES_KEY: &str = "favorite-locations";

/// True if `set` holds an entry equal to `location`.
pub fn contains(set: &[Location], location: &Location) -> bool {
    set.iter().any(|fav| fav == location)
}

/// Remove `location` if present, otherwise append it.
///
/// Returns the new list and whether the location was added. `set` itself is
/// left untouched.
pub fn toggle(set: &[Location], location: Location) -> (Vec<Location>, bool) {
    if contains(set, &location) {
        let kept = set.iter().filter(|fav| **fav != location).cloned().collect();
        (kept, false)
    } else {
        let mut added = Vec::with_capacity(set.len() + 1);
        added.extend_from_slice(set);
        added.push(location);
        (added, true)
    }
}

/// Ordered favorites without duplicates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    locations: Vec<Location>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, location: &Location) -> bool {
        contains(&self.locations, location)
    }

    /// Toggle membership of `location`, returning the new set and whether
    /// it was added.
    #[must_use]
    pub fn toggle(&self, location: Location) -> (Self, bool) {
        let (locations, added) = toggle(&self.locations, location);
        (Self { locations }, added)
    }

    /// Remove `location` if present. Returns whether anything was removed.
    pub fn remove(&mut self, location: &Location) -> bool {
        let before = self.locations.len();
        self.locations.retain(|fav| fav != location);
        self.locations.len() != before
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }
}

impl FromIterator<Location> for FavoritesSet {
    /// Later duplicates are dropped; the first occurrence keeps its place.
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        let mut locations: Vec<Location> = Vec::new();
        for location in iter {
            if !contains(&locations, &location) {
                locations.push(location);
            }
        }
        Self { locations }
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

/// Loads and saves the favorites list through a [`Storage`] slot.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> FavoritesStore<S> {
    /// Store using the default [`FAVORITES_KEY`] slot.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load favorites, falling back to an empty set on any failure.
    pub fn load(&self) -> FavoritesSet {
        match self.try_load() {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!("Could not load favorites, starting empty: {}", e);
                FavoritesSet::new()
            }
        }
    }

    /// Load favorites, reporting storage failures.
    ///
    /// A missing slot or a payload that is not a favorites array yields an
    /// empty set, not an error.
    pub fn try_load(&self) -> Result<FavoritesSet, PersistenceError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            tracing::debug!("No stored favorites under {}", self.key);
            return Ok(FavoritesSet::new());
        };

        match serde_json::from_str::<Vec<Location>>(&raw) {
            Ok(locations) => {
                let set: FavoritesSet = locations.into_iter().collect();
                tracing::debug!("Loaded {} favorites", set.len());
                Ok(set)
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed favorites in {}: {}", self.key, e);
                Ok(FavoritesSet::new())
            }
        }
    }

    /// Persist the full set, replacing whatever was stored.
    pub fn save(&self, set: &FavoritesSet) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(set)?;
        self.storage.write(&self.key, &json)?;
        tracing::debug!("Saved {} favorites", set.len());
        Ok(())
    }

    /// Forget all stored favorites.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove(&self.key)?;
        tracing::info!("Cleared stored favorites");
        Ok(())
    }
}

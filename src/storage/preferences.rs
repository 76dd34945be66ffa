//! Typed, best-effort access to user preferences and history.
//!
//! [`Preferences`] wraps any [`PreferencesStore`] and never propagates
//! failures: reads fall back to defaults, writes report `false` and log. The
//! coordinator can therefore persist on every state change without its own
//! error handling.

use super::backend::PreferencesStore;
use super::history::{push_recent, MAX_RECENT_ENTRIES};
use super::models::{keys, EntryId, FavoriteEntry, MapLayer, RecentEntry, ThemePreference};
use crate::domain::{Coordinate, TravelMode, UserLocation};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed helpers over a preferences backend.
pub struct Preferences {
    store: Box<dyn PreferencesStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

impl Preferences {
    #[must_use]
    pub fn new(store: Box<dyn PreferencesStore>) -> Self {
        Self { store }
    }

    /// Reads `key`, returning `default` when absent or undecodable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.store.get_value(key) else {
            return default;
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "stored preference has unexpected shape, using default");
            default
        })
    }

    /// Writes `value` under `key`. Returns `false` if it could not be stored.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to serialize preference");
                return false;
            }
        };
        match self.store.set_value(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to store preference");
                false
            }
        }
    }

    /// Removes `key`. Returns `false` if the removal could not be stored.
    pub fn remove(&mut self, key: &str) -> bool {
        self.store
            .remove(key)
            .map_err(|e| tracing::warn!(key = %key, error = %e, "failed to remove preference"))
            .is_ok()
    }

    /// Allocates the next entry id: `max(now_ms, previous + 1)`.
    ///
    /// Stays strictly increasing even if the clock goes backwards.
    fn next_entry_id(&mut self) -> EntryId {
        let previous: EntryId = self.get(keys::ENTRY_SEQUENCE, 0);
        let id = chrono::Utc::now()
            .timestamp_millis()
            .max(previous.saturating_add(1));
        self.set(keys::ENTRY_SEQUENCE, &id);
        id
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        self.get(keys::FAVORITES, Vec::new())
    }

    /// Appends a favorite and returns it, or `None` if it could not be stored.
    pub fn add_favorite(
        &mut self,
        name: String,
        coordinate: Coordinate,
        address: String,
    ) -> Option<FavoriteEntry> {
        let entry = FavoriteEntry {
            id: self.next_entry_id(),
            name,
            coordinate,
            address,
            created_at: chrono::Utc::now().timestamp(),
        };
        let mut favorites = self.favorites();
        favorites.push(entry.clone());
        self.set(keys::FAVORITES, &favorites).then_some(entry)
    }

    /// Deletes the favorite with `id`. Returns whether one was removed.
    pub fn remove_favorite(&mut self, id: EntryId) -> bool {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            tracing::debug!(id = id, "favorite not found, nothing to remove");
            return false;
        }
        self.set(keys::FAVORITES, &favorites)
    }

    #[must_use]
    pub fn recent(&self) -> Vec<RecentEntry> {
        self.get(keys::RECENT_SEARCHES, Vec::new())
    }

    /// Records a picked place at the front of the recent list.
    pub fn add_recent(&mut self, name: String, coordinate: Coordinate, address: String) -> bool {
        let entry = RecentEntry {
            id: self.next_entry_id(),
            name,
            coordinate,
            address,
            timestamp: chrono::Utc::now().timestamp(),
        };
        let mut recent = self.recent();
        push_recent(&mut recent, entry, MAX_RECENT_ENTRIES);
        self.set(keys::RECENT_SEARCHES, &recent)
    }

    pub fn clear_recent(&mut self) -> bool {
        self.remove(keys::RECENT_SEARCHES)
    }

    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.get(keys::THEME, ThemePreference::default())
    }

    pub fn set_theme(&mut self, theme: ThemePreference) -> bool {
        self.set(keys::THEME, &theme)
    }

    #[must_use]
    pub fn last_location(&self) -> Option<UserLocation> {
        self.get(keys::LAST_LOCATION, None)
    }

    pub fn set_last_location(&mut self, location: &UserLocation) -> bool {
        self.set(keys::LAST_LOCATION, location)
    }

    #[must_use]
    pub fn map_layer(&self) -> MapLayer {
        self.get(keys::MAP_LAYER, MapLayer::default())
    }

    pub fn set_map_layer(&mut self, layer: MapLayer) -> bool {
        self.set(keys::MAP_LAYER, &layer)
    }

    #[must_use]
    pub fn travel_mode(&self) -> TravelMode {
        self.get(keys::TRAVEL_MODE, TravelMode::default())
    }

    pub fn set_travel_mode(&mut self, mode: TravelMode) -> bool {
        self.set(keys::TRAVEL_MODE, &mode)
    }
}

//! Storage layer for persistent preferences and history.
//!
//! This module provides the key/value persistence used for favorites, recent
//! searches, theme, last known location, map layer and travel mode. Nothing
//! here holds business logic beyond the recent-list dedup/cap rule.
//!
//! # Modules
//!
//! - `backend`: Key/value trait abstraction for backend implementations
//! - `json`: JSON file-based backend with atomic writes
//! - `memory`: In-memory backend with an optional quota
//! - `preferences`: Typed, best-effort helpers over any backend
//! - `history`: Recent-list dedup and capping
//! - `models`: Persisted record types and keys

pub mod backend;
pub mod history;
pub mod json;
pub mod memory;
pub mod models;
pub mod preferences;

pub use backend::PreferencesStore;
pub use history::{push_recent, MAX_RECENT_ENTRIES};
pub use json::JsonPreferences;
pub use memory::MemoryPreferences;
pub use models::{keys, EntryId, FavoriteEntry, MapLayer, RecentEntry, ThemePreference};
pub use preferences::Preferences;

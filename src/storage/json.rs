//! JSON file-based preferences backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) to
//! prevent corruption on crashes.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) - loads entire file into memory once
//! - **Write**: O(n) - serializes and writes entire dataset
//! - **Best for**: small preference sets written on user actions

use crate::domain::error::{Result, WayfinderError};
use crate::storage::backend::PreferencesStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// JSON storage container format.
///
/// This is the top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// All stored preferences keyed by name.
    #[serde(default)]
    values: BTreeMap<String, Value>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            values: BTreeMap::new(),
        }
    }
}

/// JSON file preferences backend.
///
/// The entire dataset is kept in memory and persisted on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "values": {
///     "theme": "dark",
///     "travel_mode": "walking",
///     "last_location": { "coordinate": { "lat": 51.5, "lng": -0.12 }, "accuracy_m": 12.0, "captured_at": 1700000000 }
///   }
/// }
/// ```
pub struct JsonPreferences {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonPreferences {
    /// Creates or opens a JSON preferences file.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty. Parent
    /// directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wayfinder::storage::JsonPreferences;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonPreferences::new(PathBuf::from("/tmp/preferences.json"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON preferences");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty preferences");
            StorageData::default()
        };

        tracing::debug!(key_count = data.values.len(), "preferences initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| WayfinderError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            keys = data.values.len(),
            "loaded preferences"
        );

        Ok(data)
    }

    /// Saves data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path
    /// so the file is never left half-written.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| WayfinderError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "preferences saved");
        Ok(())
    }
}

impl PreferencesStore for JsonPreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.data.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        let _span = tracing::debug_span!("json_set_value", key = %key).entered();

        if self.data.values.get(key) == Some(&value) {
            tracing::trace!("value unchanged");
            return Ok(());
        }

        let previous = self.data.values.insert(key.to_string(), value);
        self.dirty = true;
        self.save_or_restore(key, previous)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key = %key).entered();

        match self.data.values.remove(key) {
            Some(previous) => {
                self.dirty = true;
                self.save_or_restore(key, Some(previous))
            }
            None => Ok(()),
        }
    }
}

impl JsonPreferences {
    /// Saves, or puts `previous` back under `key` if the save fails, so a
    /// change reported as failed is never visible or written later.
    fn save_or_restore(&mut self, key: &str, previous: Option<Value>) -> Result<()> {
        let result = self.save_to_file();
        if let Err(e) = &result {
            tracing::warn!(key = %key, error = %e, "save failed, reverting change");
            match previous {
                Some(value) => self.data.values.insert(key.to_string(), value),
                None => self.data.values.remove(key),
            };
            self.dirty = false;
        }
        result
    }
}

impl Drop for JsonPreferences {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty preferences on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

//! Preferences storage backend abstraction.
//!
//! This module defines the [`PreferencesStore`] trait, a raw key/value store of
//! JSON values. Typed, best-effort helpers live on
//! [`Preferences`](super::Preferences); backends only move values in and out.
//!
//! # Design Philosophy
//!
//! The trait mirrors browser-local key/value storage: synchronous, string keys,
//! no transactions. Backends report failures through [`Result`]; it is the
//! typed layer above that decides to log and continue.

use crate::domain::error::Result;
use serde_json::Value;

/// Abstraction over persistent key/value backends.
///
/// # Implementations
///
/// - [`JsonPreferences`](super::JsonPreferences): JSON file with atomic writes (default)
/// - [`MemoryPreferences`](super::MemoryPreferences): in-process map with an optional size quota
///
/// # Examples
///
/// ```
/// use wayfinder::storage::{MemoryPreferences, PreferencesStore};
///
/// let mut store = MemoryPreferences::default();
/// store.set_value("theme", serde_json::json!("dark"))?;
/// assert_eq!(store.get_value("theme"), Some(serde_json::json!("dark")));
/// # Ok::<(), wayfinder::WayfinderError>(())
/// ```
pub trait PreferencesStore: Send {
    /// Returns the stored value for `key`, or `None` if absent.
    fn get_value(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted (quota, I/O).
    fn set_value(&mut self, key: &str, value: Value) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}

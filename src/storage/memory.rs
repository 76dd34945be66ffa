//! In-memory preferences backend.
//!
//! Used when the data directory is unavailable and throughout the tests. An
//! optional byte quota reproduces the "quota exceeded" failure of browser
//! storage.

use crate::domain::error::{Result, WayfinderError};
use crate::storage::backend::PreferencesStore;
use serde_json::Value;
use std::collections::HashMap;

/// Volatile key/value store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, Value>,
    quota_bytes: Option<usize>,
}

impl MemoryPreferences {
    /// Creates a store that rejects writes once the serialized size of all
    /// values would exceed `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn size_with(&self, key: &str, value: &Value) -> usize {
        let others: usize = self
            .values
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.to_string().len())
            .sum();
        others + key.len() + value.to_string().len()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let size = self.size_with(key, &value);
            if size > quota {
                return Err(WayfinderError::Storage(format!(
                    "quota exceeded: {size} > {quota} bytes"
                )));
            }
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quota_rejects_oversized_writes() {
        let mut store = MemoryPreferences::with_quota(16);
        assert!(store.set_value("a", json!("short")).is_ok());
        assert!(store.set_value("b", json!("much too long for the quota")).is_err());
        assert_eq!(store.get_value("b"), None);
    }

    #[test]
    fn replacing_a_value_does_not_double_count() {
        let mut store = MemoryPreferences::with_quota(12);
        store.set_value("k", json!("12345678")).unwrap();
        assert!(store.set_value("k", json!("87654321")).is_ok());
    }
}

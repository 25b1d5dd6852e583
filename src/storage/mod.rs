//! Persisted key-value storage for Codepad
//!
//! Everything the editor remembers between sessions goes through the
//! [`KeyValueStore`] trait: string keys mapping to JSON-encoded string values.
//! The native build uses [`DirStorage`] (one file per key under the platform
//! data directory); tests use [`MemoryStorage`].
//!
//! Reads never fail loudly: a missing or malformed value is treated as absent
//! and the caller's default is used. Write failures are logged and reported
//! as `false`, never raised to the user at the point of failure.

mod dir;
mod memory;

pub use dir::DirStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────────────────────────

/// Key holding the serialized file list.
pub const FILES_KEY: &str = "files";

/// Key holding the details panel width in pixels.
pub const PANEL_WIDTH_KEY: &str = "panelWidth";

/// Key holding whether the details panel is visible.
pub const PANEL_VISIBLE_KEY: &str = "panelVisible";

// ─────────────────────────────────────────────────────────────────────────────
// KeyValueStore Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A durable string key-value store.
pub trait KeyValueStore {
    /// Read the raw value for `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Whether a value is stored under `key`.
    fn contains(&self, key: &str) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read and decode a JSON value, falling back to `default` when the key is
/// absent, unreadable or malformed.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    try_read_json(store, key).unwrap_or(default)
}

/// Read and decode a JSON value, returning `None` when the key is absent,
/// unreadable or malformed.
pub fn try_read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Error reading '{}' from storage: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Stored value for '{}' is malformed: {}", key, e);
            None
        }
    }
}

/// Encode `value` as JSON and write it under `key`.
///
/// Returns `true` on success; failures are logged only.
pub fn write_json<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> bool {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("Error serializing '{}' for storage: {}", key, e);
            return false;
        }
    };

    match store.set(key, &json) {
        Ok(()) => true,
        Err(e) => {
            warn!("Error saving '{}' to storage: {}", key, e);
            false
        }
    }
}

/// Remove `key`, logging failures. Returns `true` on success.
pub fn remove_key(store: &mut dyn KeyValueStore, key: &str) -> bool {
    match store.remove(key) {
        Ok(()) => true,
        Err(e) => {
            warn!("Error removing '{}' from storage: {}", key, e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_key_uses_default() {
        let store = MemoryStorage::new();
        let width: f32 = read_json(&store, PANEL_WIDTH_KEY, 300.0);
        assert_eq!(width, 300.0);
    }

    #[test]
    fn test_read_json_malformed_uses_default() {
        let mut store = MemoryStorage::new();
        store.set(PANEL_VISIBLE_KEY, "not-a-bool").unwrap();
        let visible: bool = read_json(&store, PANEL_VISIBLE_KEY, true);
        assert!(visible);
    }

    #[test]
    fn test_write_then_read_json() {
        let mut store = MemoryStorage::new();
        assert!(write_json(&mut store, PANEL_WIDTH_KEY, &420.0f32));
        assert_eq!(store.get(PANEL_WIDTH_KEY).unwrap().as_deref(), Some("420.0"));

        let width: f32 = read_json(&store, PANEL_WIDTH_KEY, 0.0);
        assert_eq!(width, 420.0);
    }

    #[test]
    fn test_remove_key_and_contains() {
        let mut store = MemoryStorage::new();
        write_json(&mut store, FILES_KEY, &Vec::<String>::new());
        assert!(store.contains(FILES_KEY));

        assert!(remove_key(&mut store, FILES_KEY));
        assert!(!store.contains(FILES_KEY));

        // Removing again is fine
        assert!(remove_key(&mut store, FILES_KEY));
    }

    #[test]
    fn test_try_read_json_distinguishes_absent() {
        let store = MemoryStorage::new();
        let value: Option<Vec<u32>> = try_read_json(&store, FILES_KEY);
        assert!(value.is_none());
    }
}

//! String-keyed persistence contract.
//!
//! Every durable record in the app (collections, stats, unlocked sets and the
//! reset generation) lives under one fixed key in a [`KeyValueStore`]. The
//! progression engine never talks to LMDB directly, so tests can run against
//! [`MemoryStore`] and production against [`crate::local_db_state::AppDbState`].

use std::collections::HashMap;
use std::sync::Mutex;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Fixed namespaced keys of the persisted records.
pub mod keys {
    pub const COLLECTIONS: &str = "bird_collections_v2";
    pub const RESET_GENERATION: &str = "bird_reset_tick_v1";
    pub const STATS: &str = "bc_stats_v1";
    pub const UNLOCKED_KEYS: &str = "bc_unlocked_keys_v1";
    pub const UNLOCKED_BIRDS: &str = "bc_unlocked_birds_v1";
}

/// Minimal get/set/remove store holding UTF-8 text values.
///
/// Each `set` replaces the whole value for a key. Implementations must make a
/// single `set` or `remove` atomic; nothing spanning several keys is atomic.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a key that is not present succeeds.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {e}")))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {e}")))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {e}")))?;
        map.remove(key);
        Ok(())
    }
}

/// Reads and parses the JSON value under `key`.
///
/// An absent key or an empty value yields `T::default()`. A value that does not
/// parse is logged and also replaced by `T::default()`; the original bytes are
/// unrecoverable and the caller is better served by an empty view. Backend
/// failures are returned as errors.
pub fn load_json_or_default<S, T>(store: &S, key: &str) -> StoreResult<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key)? {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(T::default()),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Discarding malformed value under '{key}': {e}");
            Ok(T::default())
        }
    }
}

/// Serializes `value` and replaces the record under `key`.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

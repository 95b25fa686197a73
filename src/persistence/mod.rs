//! Key-value persistence
//!
//! Settings, high scores and achievements are small JSON blobs stored under
//! fixed keys. Storage failures are reported to the caller and never stop the
//! game; unreadable blobs fall back to defaults.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and decode `key`, falling back to `T::default()` if it is missing,
/// unreadable or malformed
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring malformed '{}': {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not read '{}': {}", key, e);
            T::default()
        }
    }
}

/// Encode and write `value` under `key`
pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that refuses every operation
    struct Broken;

    impl KeyValueStore for Broken {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_owned(),
                reason: "quota exceeded".into(),
            })
        }
        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_json_roundtrip_through_memory_store() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "numbers", &vec![3u32, 1, 2]).unwrap();
        let back: Vec<u32> = load_json(&store, "numbers");
        assert_eq!(back, vec![3, 1, 2]);
    }

    #[test]
    fn test_missing_and_malformed_fall_back_to_default() {
        let mut store = MemoryStore::new();
        let missing: Vec<u32> = load_json(&store, "nothing");
        assert!(missing.is_empty());

        store.set("bad", "{not json").unwrap();
        let bad: Vec<u32> = load_json(&store, "bad");
        assert!(bad.is_empty());
    }

    #[test]
    fn test_broken_backend_is_not_fatal() {
        let mut store = Broken;
        let loaded: Vec<u32> = load_json(&store, "anything");
        assert!(loaded.is_empty());
        assert!(matches!(save_json(&mut store, "k", &1u32), Err(StoreError::Write { .. })));
    }
}

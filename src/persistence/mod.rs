//! Key-value persistence with a versioned JSON envelope
//!
//! Features:
//! - `KeyValueStore` seam with in-memory, file (native) and LocalStorage (wasm) backends
//! - Versioned `{ "version": N, "data": ... }` envelope around every value
//! - Corrupt, legacy or mismatched values decode to the caller's default
//!
//! Writes are fire-and-forget: backend faults are logged and swallowed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Current envelope version. Values written under any other version are discarded.
pub const FORMAT_VERSION: u32 = 1;

/// Minimal string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Process-local store, used for anonymous sessions and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

/// Wrap `value` in the current envelope
pub fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope {
        version: FORMAT_VERSION,
        data: value,
    })
}

/// Unwrap an envelope; `None` for malformed JSON or a different version
pub fn decode<T: DeserializeOwned>(json: &str) -> Option<T> {
    let envelope: Envelope<T> = serde_json::from_str(json).ok()?;
    (envelope.version == FORMAT_VERSION).then_some(envelope.data)
}

/// Load the value at `key`, falling back to `T::default()` when absent or unreadable
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(json) = store.get(key) else {
        return T::default();
    };
    match decode(&json) {
        Some(value) => value,
        None => {
            log::warn!("Discarding unreadable value at {key}");
            T::default()
        }
    }
}

/// Store `value` at `key` in the current envelope
pub fn save<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    match encode(value) {
        Ok(json) => store.set(key, &json),
        Err(e) => log::warn!("Failed to encode value for {key}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    #[test]
    fn test_memory_store_basics() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a");
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_envelope_shape() {
        let json = encode(&Counter { hits: 3 }).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(raw["version"], FORMAT_VERSION);
        assert_eq!(raw["data"]["hits"], 3);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save(&mut store, "counter", &Counter { hits: 7 });
        let loaded: Counter = load_or_default(&store, "counter");
        assert_eq!(loaded.hits, 7);
    }

    #[test]
    fn test_corrupt_and_foreign_versions_fall_back() {
        let mut store = MemoryStore::new();
        store.set("garbage", "{not json");
        store.set("future", r#"{"version":99,"data":{"hits":5}}"#);
        store.set("bare", r#"{"hits":5}"#);
        for key in ["garbage", "future", "bare", "missing"] {
            let loaded: Counter = load_or_default(&store, key);
            assert_eq!(loaded, Counter::default(), "key {key}");
        }
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        save(&mut store, "counter", &Counter { hits: 2 });
        let loaded: Counter = load_or_default(&store, "counter");
        assert_eq!(loaded.hits, 2);
    }
}

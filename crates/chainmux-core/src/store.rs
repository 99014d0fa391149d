//! Pluggable key-value persistence.
//!
//! Used for the ABI cache: keys are `"{chainId}_{contractAddress}"`,
//! values are raw ABI JSON text. `MemoryStore` is always available;
//! file-backed stores live with the connection layer.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// A string key-value store.
///
/// Implementations must be `Send + Sync`; callers hold them as
/// `Arc<dyn KvStore>`.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// The cache key for an ABI entry.
pub fn abi_cache_key(chain_id: u64, address: &str) -> String {
    format!("{chain_id}_{address}")
}

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.inner.write().unwrap().insert(key.into(), value.into());
    }

    fn remove(&self, key: &str) {
        self.inner.write().unwrap().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        let key = abi_cache_key(1, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(key, "1_0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert!(store.get(&key).is_none());
        store.put(&key, "[]");
        assert_eq!(store.get(&key).as_deref(), Some("[]"));
        store.remove(&key);
        assert!(store.get(&key).is_none());
    }
}

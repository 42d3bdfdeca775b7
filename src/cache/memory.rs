//! In-memory key-value store.

use dashmap::DashMap;
use std::sync::Arc;

use crate::cache::KeyValueStore;

/// Volatile store, shared across clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.inner.insert(key.to_string(), value);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

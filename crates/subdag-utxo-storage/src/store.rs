//! Key-value store abstraction.
//!
//! The production store is an external transactional database; this
//! layer only needs namespaced byte get/put/delete and the store's own
//! corruption signal. Writes to the same key are serialized by the store,
//! and reads are snapshot-consistent — neither is this crate's concern.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Errors raised by a backing store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store detected damage to its own data.
    #[error("store corruption: {0}")]
    Corruption(String),

    /// The requested namespace was never created.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),
}

/// Namespaced byte-slice storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), StoreError>;
}

/// In-memory store backed by per-namespace maps.
pub struct MemoryStore {
    namespaces: RwLock<HashMap<String, HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates a store with the given namespaces.
    pub fn new(namespaces: &[&str]) -> Self {
        Self {
            namespaces: RwLock::new(
                namespaces
                    .iter()
                    .map(|namespace| (namespace.to_string(), HashMap::new()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let namespaces = self.namespaces.read();
        let map = namespaces
            .get(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write();
        let map = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> Result<(), StoreError> {
        let mut namespaces = self.namespaces.write();
        let map = namespaces
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        map.remove(key);
        Ok(())
    }
}

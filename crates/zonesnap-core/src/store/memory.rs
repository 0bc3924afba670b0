// # Memory Object Store
//
// In-memory implementation of ObjectStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for tests and for dry runs where writing real artifacts isn't
// wanted.
//
// ## Semantics
//
// - Listing a bucket that was never written returns an empty key list
//   (indistinguishable from an empty bucket, matching the "no prior
//   backup" signal the selector expects)
// - Fetching a missing key is an error, like any real store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::ObjectStore;

/// In-memory object store implementation
///
/// Buckets are nested HashMaps behind a RwLock. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    inner: Arc<RwLock<HashMap<String, HashMap<String, Vec<u8>>>>>,
}

impl MemoryObjectStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects across all buckets
    pub async fn len(&self) -> usize {
        self.inner.read().await.values().map(HashMap::len).sum()
    }

    /// Whether the store holds no objects
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn list(&self, bucket: &str) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let guard = self.inner.read().await;
        guard
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
            .ok_or_else(|| Error::store_key(bucket, key, "object not found"))
    }

    async fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.to_vec());
        Ok(())
    }
}

// # Object Store Trait
//
// Defines the interface for the blob store that holds zone snapshots.
//
// ## Implementations
//
// - Memory: `zonesnap_core::store::MemoryObjectStore`
// - Filesystem: `zonesnap_core::store::FsObjectStore`
// - Future: S3, GCS, any bucket-shaped API
//
// ## Contract
//
// Keys are opaque strings to the store; the engine imposes the artifact
// key format on them. The engine never deletes: retention is "newest key
// wins at selection time", old artifacts simply stop being selected.
//
// Implementations must not retry internally. A failed call is returned
// as-is and the engine wraps it with bucket/key context; the caller
// decides whether to re-run the whole cycle.

use async_trait::async_trait;

/// Trait for snapshot blob storage
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Atomicity
///
/// `put` must write the blob as a single atomic unit: a reader must never
/// observe partial artifact content under a key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all keys in a bucket
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)`: All keys, in no particular order
    /// - `Err(Error)`: Storage error
    async fn list(&self, bucket: &str) -> Result<Vec<String>, crate::Error>;

    /// Fetch the blob stored under a key
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<u8>)`: The blob content
    /// - `Err(Error)`: Key not found or storage error
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, crate::Error>;

    /// Store a blob under a key, replacing any existing content
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Blob durably stored
    /// - `Err(Error)`: Storage error
    async fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), crate::Error>;
}

// # Filesystem Object Store
//
// File-backed implementation of ObjectStore.
//
// ## Layout
//
// One directory per bucket under a root, one file per key:
//
// ```text
// <root>/<bucket>/<key>
// ```
//
// Artifact keys contain only prefix, domain, and timestamp characters, so
// they map directly to file names. Keys carrying path separators are
// rejected rather than interpreted.
//
// ## Atomicity
//
// Writes go to a temporary file in the bucket directory and are renamed
// into place, so a reader never observes partial artifact content.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::ObjectStore;

/// Filesystem object store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            Error::config(format!(
                "Failed to create store root {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, Error> {
        validate_component(bucket)?;
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, Error> {
        validate_component(key)?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }
}

fn validate_component(component: &str) -> Result<(), Error> {
    if component.is_empty()
        || component.contains('/')
        || component.contains('\\')
        || component == "."
        || component == ".."
    {
        return Err(Error::invalid_input(format!(
            "invalid bucket or key component: {component:?}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self, bucket: &str) -> Result<Vec<String>, Error> {
        let dir = self.bucket_dir(bucket)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // A bucket that was never written is an empty bucket.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::store(bucket, format!("list failed: {e}"))),
        };

        let mut keys = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    if let Some(name) = entry.file_name().to_str() {
                        // Skip in-flight temp files from concurrent writers.
                        if !name.ends_with(".tmp") {
                            keys.push(name.to_string());
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => return Err(Error::store(bucket, format!("list failed: {e}"))),
            }
        }
        Ok(keys)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path)
            .await
            .map_err(|e| Error::store_key(bucket, key, format!("read failed: {e}")))
    }

    async fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), Error> {
        let path = self.object_path(bucket, key)?;
        let dir = self.bucket_dir(bucket)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::store(bucket, format!("create bucket dir failed: {e}")))?;

        // Write-then-rename for atomicity.
        let temp_path = dir.join(format!("{key}.tmp"));
        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| Error::store_key(bucket, key, format!("create failed: {e}")))?;
            file.write_all(body)
                .await
                .map_err(|e| Error::store_key(bucket, key, format!("write failed: {e}")))?;
            file.flush()
                .await
                .map_err(|e| Error::store_key(bucket, key, format!("flush failed: {e}")))?;
        }
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::store_key(bucket, key, format!("rename failed: {e}")))?;

        tracing::trace!(bucket, key, bytes = body.len(), "object written");
        Ok(())
    }
}

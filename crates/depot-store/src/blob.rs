//! In-memory blob store
//!
//! Presigned URLs are synthetic `memory://` URLs; "uploading" is simulated
//! by calling [`MemoryBlobStore::put`].

use async_trait::async_trait;
use depot_core::effects::{BlobStore, Disposition};
use depot_core::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Blob store that tracks which keys have been uploaded
#[derive(Clone)]
pub struct MemoryBlobStore {
    bucket: String,
    objects: Arc<RwLock<HashSet<String>>>,
}

impl MemoryBlobStore {
    /// Create a store for `bucket`
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Simulate a client upload completing
    pub async fn put(&self, key: impl Into<String>) {
        self.objects.write().await.insert(key.into());
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds nothing
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("depot")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String> {
        Ok(format!(
            "memory://{}/{key}?method=PUT&content-type={content_type}&expires={}",
            self.bucket,
            expires_in.as_secs()
        ))
    }

    async fn presign_download(
        &self,
        key: &str,
        filename_hint: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> Result<String> {
        Ok(format!(
            "memory://{}/{key}?method=GET&disposition={}&filename={filename_hint}&expires={}",
            self.bucket,
            disposition.as_str(),
            expires_in.as_secs()
        ))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains(key))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.objects.write().await.remove(key))
    }
}

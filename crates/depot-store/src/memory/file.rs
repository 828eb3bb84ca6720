//! In-memory file record store

use async_trait::async_trait;
use depot_core::effects::FileStore;
use depot_core::{DepotError, DirectoryId, FileId, FileRecord, FileUpdate, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory file store with a unique `storage_key`
#[derive(Clone, Default)]
pub struct MemoryFileStore {
    data: Arc<RwLock<IndexMap<FileId, FileRecord>>>,
}

impl MemoryFileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Every record in insertion order
    pub async fn all(&self) -> Vec<FileRecord> {
        self.data.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn get(&self, id: &FileId) -> Result<Option<FileRecord>> {
        Ok(self.data.read().await.get(id).cloned())
    }

    async fn create(&self, file: FileRecord) -> Result<()> {
        let mut data = self.data.write().await;
        if data.contains_key(&file.id) {
            return Err(DepotError::conflict(format!("file id {} already exists", file.id)));
        }
        if data.values().any(|f| f.storage_key == file.storage_key) {
            return Err(DepotError::conflict(format!(
                "storage key {} already in use",
                file.storage_key
            )));
        }
        data.insert(file.id.clone(), file);
        Ok(())
    }

    async fn list_by_directory(&self, directory: &DirectoryId) -> Result<Vec<FileRecord>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|f| &f.directory_id == directory)
            .cloned()
            .collect())
    }

    async fn any_in_directory(&self, directory: &DirectoryId) -> Result<bool> {
        let data = self.data.read().await;
        Ok(data.values().any(|f| &f.directory_id == directory))
    }

    async fn update_fields(&self, id: &FileId, update: FileUpdate) -> Result<Option<FileRecord>> {
        let mut data = self.data.write().await;
        Ok(data.get_mut(id).map(|file| {
            update.apply_to(file);
            file.clone()
        }))
    }

    async fn delete_one(&self, id: &FileId) -> Result<bool> {
        Ok(self.data.write().await.shift_remove(id).is_some())
    }

    async fn delete_by_directories(&self, directories: &[DirectoryId]) -> Result<usize> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, f| !directories.contains(&f.directory_id));
        Ok(before - data.len())
    }
}

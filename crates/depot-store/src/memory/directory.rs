//! In-memory directory store

use async_trait::async_trait;
use depot_core::effects::DirectoryStore;
use depot_core::{Directory, DirectoryId, DirectoryUpdate, DepotError, Result, UserId};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory directory store keyed by id, insertion ordered
#[derive(Clone, Default)]
pub struct MemoryDirectoryStore {
    data: Arc<RwLock<IndexMap<DirectoryId, Directory>>>,
}

impl MemoryDirectoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored directories
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Overwrite a document without index checks.
    ///
    /// Test fixtures use this to plant states the public API refuses to
    /// produce, such as dangling parent links.
    pub async fn put_unchecked(&self, directory: Directory) {
        self.data.write().await.insert(directory.id.clone(), directory);
    }
}

fn path_taken(
    data: &IndexMap<DirectoryId, Directory>,
    owner: &UserId,
    path: &str,
    except: Option<&DirectoryId>,
) -> bool {
    data.values()
        .any(|d| &d.owner_id == owner && d.path == path && Some(&d.id) != except)
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn get(&self, id: &DirectoryId) -> Result<Option<Directory>> {
        Ok(self.data.read().await.get(id).cloned())
    }

    async fn find_by_owner_and_path(
        &self,
        owner: &UserId,
        path: &str,
    ) -> Result<Option<Directory>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .find(|d| &d.owner_id == owner && d.path == path)
            .cloned())
    }

    async fn children_of(&self, id: &DirectoryId) -> Result<Vec<Directory>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|d| d.parent_id.as_ref() == Some(id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Directory>> {
        Ok(self.data.read().await.values().cloned().collect())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Directory>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|d| &d.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn list_public(&self) -> Result<Vec<Directory>> {
        let data = self.data.read().await;
        Ok(data.values().filter(|d| d.is_public).cloned().collect())
    }

    async fn get_many(&self, ids: &[DirectoryId]) -> Result<Vec<Directory>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|d| ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn create(&self, directory: Directory) -> Result<()> {
        let mut data = self.data.write().await;
        if data.contains_key(&directory.id) {
            return Err(DepotError::conflict(format!(
                "directory id {} already exists",
                directory.id
            )));
        }
        if path_taken(&data, &directory.owner_id, &directory.path, None) {
            return Err(DepotError::conflict(format!(
                "directory path {} already exists for owner {}",
                directory.path, directory.owner_id
            )));
        }
        data.insert(directory.id.clone(), directory);
        Ok(())
    }

    async fn update_fields(
        &self,
        id: &DirectoryId,
        update: DirectoryUpdate,
    ) -> Result<Option<Directory>> {
        let mut data = self.data.write().await;
        let owner = match data.get(id) {
            Some(existing) => existing.owner_id.clone(),
            None => return Ok(None),
        };
        if let Some(path) = &update.path {
            if path_taken(&data, &owner, path, Some(id)) {
                return Err(DepotError::conflict(format!(
                    "directory path {path} already exists for owner {owner}"
                )));
            }
        }
        let Some(directory) = data.get_mut(id) else {
            return Ok(None);
        };
        update.apply_to(directory);
        Ok(Some(directory.clone()))
    }

    async fn delete_many(&self, ids: &[DirectoryId]) -> Result<usize> {
        let mut data = self.data.write().await;
        Ok(ids
            .iter()
            .filter(|id| data.shift_remove(*id).is_some())
            .count())
    }
}

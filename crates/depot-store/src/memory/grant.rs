//! In-memory permission grant store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use depot_core::effects::GrantStore;
use depot_core::{DirectoryId, GrantId, PermissionGrant, PermissionSet, Result, UserId};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type GrantKey = (UserId, DirectoryId);

/// In-memory grant store with a unique `(user_id, directory_id)` key
#[derive(Clone, Default)]
pub struct MemoryGrantStore {
    data: Arc<RwLock<IndexMap<GrantKey, PermissionGrant>>>,
}

impl MemoryGrantStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored grants
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Every grant in insertion order
    pub async fn all(&self) -> Vec<PermissionGrant> {
        self.data.read().await.values().cloned().collect()
    }

    /// Insert a fully formed grant, replacing any grant for the same pair
    pub async fn put(&self, grant: PermissionGrant) {
        let key = (grant.user_id.clone(), grant.directory_id.clone());
        self.data.write().await.insert(key, grant);
    }
}

#[async_trait]
impl GrantStore for MemoryGrantStore {
    async fn find(
        &self,
        grantee: &UserId,
        directory: &DirectoryId,
    ) -> Result<Option<PermissionGrant>> {
        let key = (grantee.clone(), directory.clone());
        Ok(self.data.read().await.get(&key).cloned())
    }

    async fn list_by_directory(&self, directory: &DirectoryId) -> Result<Vec<PermissionGrant>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|g| &g.directory_id == directory)
            .cloned()
            .collect())
    }

    async fn list_by_grantee(&self, grantee: &UserId) -> Result<Vec<PermissionGrant>> {
        let data = self.data.read().await;
        Ok(data
            .values()
            .filter(|g| &g.user_id == grantee)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        grantee: &UserId,
        directory: &DirectoryId,
        permissions: PermissionSet,
        granted_by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<PermissionGrant> {
        let mut data = self.data.write().await;
        let grant = data
            .entry((grantee.clone(), directory.clone()))
            .and_modify(|existing| existing.permissions = permissions.clone())
            .or_insert_with(|| PermissionGrant {
                id: GrantId::generate(),
                user_id: grantee.clone(),
                directory_id: directory.clone(),
                permissions,
                granted_by: granted_by.clone(),
                created_at: at,
            });
        Ok(grant.clone())
    }

    async fn delete_one(&self, grantee: &UserId, directory: &DirectoryId) -> Result<bool> {
        let key = (grantee.clone(), directory.clone());
        Ok(self.data.write().await.shift_remove(&key).is_some())
    }

    async fn delete_many(&self, directories: &[DirectoryId]) -> Result<usize> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|(_, directory), _| !directories.contains(directory));
        Ok(before - data.len())
    }
}

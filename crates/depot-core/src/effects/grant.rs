//! Permission grant persistence.

use crate::domain::PermissionGrant;
use crate::errors::Result;
use crate::identifiers::{DirectoryId, UserId};
use crate::permission::PermissionSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persisted per-(user, directory) ACL entries.
///
/// The `(user_id, directory_id)` pair is unique; `upsert` replaces the
/// capability set of an existing entry instead of adding a second one.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Grant held by `grantee` anchored exactly at `directory`.
    async fn find(
        &self,
        grantee: &UserId,
        directory: &DirectoryId,
    ) -> Result<Option<PermissionGrant>>;

    /// Every grant anchored at `directory`.
    async fn list_by_directory(&self, directory: &DirectoryId) -> Result<Vec<PermissionGrant>>;

    /// Every grant held by `grantee`.
    async fn list_by_grantee(&self, grantee: &UserId) -> Result<Vec<PermissionGrant>>;

    /// Create or replace the grant for `(grantee, directory)`.
    async fn upsert(
        &self,
        grantee: &UserId,
        directory: &DirectoryId,
        permissions: PermissionSet,
        granted_by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<PermissionGrant>;

    /// Remove the grant for `(grantee, directory)`; `true` if one existed.
    async fn delete_one(&self, grantee: &UserId, directory: &DirectoryId) -> Result<bool>;

    /// Remove every grant anchored at any of `directories`.
    async fn delete_many(&self, directories: &[DirectoryId]) -> Result<usize>;
}

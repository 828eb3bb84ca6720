//! Directory persistence.

use crate::domain::{Directory, DirectoryUpdate};
use crate::errors::Result;
use crate::identifiers::{DirectoryId, UserId};
use async_trait::async_trait;

/// Persisted directory tree.
///
/// Handlers must enforce the `(owner_id, path)` uniqueness index and report
/// a violation as `DepotError::Conflict`. Enumerations return documents in
/// the handler's natural order; callers must not rely on it being stable.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Fetch one directory.
    async fn get(&self, id: &DirectoryId) -> Result<Option<Directory>>;

    /// Duplicate detection lookup.
    async fn find_by_owner_and_path(&self, owner: &UserId, path: &str)
        -> Result<Option<Directory>>;

    /// Direct children of `id`.
    async fn children_of(&self, id: &DirectoryId) -> Result<Vec<Directory>>;

    /// Every directory.
    async fn list_all(&self) -> Result<Vec<Directory>>;

    /// Directories owned by `owner`.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Directory>>;

    /// Directories with the public flag set.
    async fn list_public(&self) -> Result<Vec<Directory>>;

    /// Directories whose id is in `ids`; absent ids are skipped.
    async fn get_many(&self, ids: &[DirectoryId]) -> Result<Vec<Directory>>;

    /// Insert a new directory.
    async fn create(&self, directory: Directory) -> Result<()>;

    /// Apply a field update; returns the updated document, `None` if absent.
    async fn update_fields(
        &self,
        id: &DirectoryId,
        update: DirectoryUpdate,
    ) -> Result<Option<Directory>>;

    /// Remove every listed directory; returns how many existed.
    async fn delete_many(&self, ids: &[DirectoryId]) -> Result<usize>;
}

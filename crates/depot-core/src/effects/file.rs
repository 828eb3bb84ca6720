//! File metadata persistence.

use crate::domain::{FileRecord, FileUpdate};
use crate::errors::Result;
use crate::identifiers::{DirectoryId, FileId};
use async_trait::async_trait;

/// Persisted file records. `storage_key` is unique.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fetch one file record.
    async fn get(&self, id: &FileId) -> Result<Option<FileRecord>>;

    /// Insert a new record.
    async fn create(&self, file: FileRecord) -> Result<()>;

    /// Records under `directory`, confirmed or not.
    async fn list_by_directory(&self, directory: &DirectoryId) -> Result<Vec<FileRecord>>;

    /// Whether any record sits under `directory`.
    async fn any_in_directory(&self, directory: &DirectoryId) -> Result<bool>;

    /// Apply a field update; returns the updated record.
    async fn update_fields(&self, id: &FileId, update: FileUpdate) -> Result<Option<FileRecord>>;

    /// Remove one record; `true` if it existed.
    async fn delete_one(&self, id: &FileId) -> Result<bool>;

    /// Remove every record under any of `directories`.
    async fn delete_by_directories(&self, directories: &[DirectoryId]) -> Result<usize>;
}

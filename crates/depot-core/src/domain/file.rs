use crate::identifiers::{DirectoryId, FileId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a blob stored under a directory.
///
/// Files carry no ACL of their own; access follows the parent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique identifier
    pub id: FileId,
    /// Original filename
    pub filename: String,
    /// Blob store key, unique
    pub storage_key: String,
    /// MIME type declared at upload
    pub content_type: String,
    /// Declared size in bytes
    pub size: u64,
    /// Hex SHA-256, set on confirmation
    pub sha256: Option<String>,
    /// Parent directory
    pub directory_id: DirectoryId,
    /// Uploader
    pub owner_id: UserId,
    /// Blob verified to exist
    pub confirmed: bool,
    /// Reachable without authentication
    pub is_public: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Field-level file update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdate {
    /// Content hash recorded on confirmation
    pub sha256: Option<String>,
    /// Confirmation flag
    pub confirmed: Option<bool>,
    /// Public flag
    pub is_public: Option<bool>,
}

impl FileUpdate {
    /// Apply onto `file`.
    pub fn apply_to(&self, file: &mut FileRecord) {
        if let Some(sha256) = &self.sha256 {
            file.sha256 = Some(sha256.clone());
        }
        if let Some(confirmed) = self.confirmed {
            file.confirmed = confirmed;
        }
        if let Some(is_public) = self.is_public {
            file.is_public = is_public;
        }
    }
}

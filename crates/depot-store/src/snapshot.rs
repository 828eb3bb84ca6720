//! JSON state snapshots
//!
//! A snapshot is a flat dump of every collection. Loading one into a
//! [`MemoryBackend`] goes through the handlers' index checks, so a snapshot
//! with duplicate paths or emails is rejected as a `Conflict`.

use crate::memory::{MemoryDirectoryStore, MemoryFileStore, MemoryGrantStore, MemoryUserStore};
use depot_core::effects::{DirectoryStore, FileStore, UserStore};
use depot_core::{decode_record, Directory, FileRecord, PermissionGrant, Result, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat dump of every collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSnapshot {
    /// Accounts
    #[serde(default)]
    pub users: Vec<User>,
    /// Directory nodes
    #[serde(default)]
    pub directories: Vec<Directory>,
    /// File records
    #[serde(default)]
    pub files: Vec<FileRecord>,
    /// Permission grants
    #[serde(default)]
    pub grants: Vec<PermissionGrant>,
}

/// Collections as untyped documents, before each record is decoded
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    directories: Vec<Value>,
    #[serde(default)]
    files: Vec<Value>,
    #[serde(default)]
    grants: Vec<Value>,
}

impl StateSnapshot {
    /// Parse a JSON snapshot.
    ///
    /// Each record is decoded on its own, so a malformed one is a
    /// `Validation` error naming its record type.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        Ok(Self {
            users: decode_all(raw.users)?,
            directories: decode_all(raw.directories)?,
            files: decode_all(raw.files)?,
            grants: decode_all(raw.grants)?,
        })
    }
}

fn decode_all<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>> {
    records.into_iter().map(decode_record).collect()
}

/// Bundle of in-memory stores sharing one process
#[derive(Clone, Default)]
pub struct MemoryBackend {
    /// Directory store
    pub directories: MemoryDirectoryStore,
    /// Grant store
    pub grants: MemoryGrantStore,
    /// File store
    pub files: MemoryFileStore,
    /// Account store
    pub users: MemoryUserStore,
}

impl MemoryBackend {
    /// Create empty stores
    pub fn new() -> Self {
        Self::default()
    }

    /// Create stores populated from `snapshot`
    pub async fn from_snapshot(snapshot: StateSnapshot) -> Result<Self> {
        let backend = Self::new();
        backend.load(snapshot).await?;
        Ok(backend)
    }

    /// Insert every record of `snapshot`
    pub async fn load(&self, snapshot: StateSnapshot) -> Result<()> {
        let counts = (
            snapshot.users.len(),
            snapshot.directories.len(),
            snapshot.files.len(),
            snapshot.grants.len(),
        );
        for user in snapshot.users {
            self.users.create(user).await?;
        }
        for directory in snapshot.directories {
            self.directories.create(directory).await?;
        }
        for file in snapshot.files {
            self.files.create(file).await?;
        }
        for grant in snapshot.grants {
            self.grants.put(grant).await;
        }
        tracing::info!(
            users = counts.0,
            directories = counts.1,
            files = counts.2,
            grants = counts.3,
            "loaded state snapshot"
        );
        Ok(())
    }
}

use crate::identifiers::{DirectoryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A node in an owner's directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// Unique identifier
    pub id: DirectoryId,
    /// Display name of this node
    pub name: String,
    /// Exclusive owner
    pub owner_id: UserId,
    /// Parent node, `None` for a root
    pub parent_id: Option<DirectoryId>,
    /// Materialized root-to-node path, unique per owner
    pub path: String,
    /// Readable and writable by every principal
    pub is_public: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Directory {
    /// Path of a top-level directory called `name`.
    pub fn root_path(name: &str) -> String {
        format!("/{name}")
    }

    /// Path of a child of this directory called `name`.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.path, name)
    }

    /// Whether this directory has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether `user` owns this directory.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// Field-level update applied atomically to one directory document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUpdate {
    /// New display name
    pub name: Option<String>,
    /// New materialized path
    pub path: Option<String>,
    /// New public flag
    pub is_public: Option<bool>,
}

impl DirectoryUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.path.is_none() && self.is_public.is_none()
    }

    /// Apply onto `directory`.
    pub fn apply_to(&self, directory: &mut Directory) {
        if let Some(name) = &self.name {
            directory.name.clone_from(name);
        }
        if let Some(path) = &self.path {
            directory.path.clone_from(path);
        }
        if let Some(is_public) = self.is_public {
            directory.is_public = is_public;
        }
    }
}

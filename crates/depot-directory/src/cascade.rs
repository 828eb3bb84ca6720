//! Cascade delete planning and execution
//!
//! Planning is a read-only breadth-first walk over `children_of`. Execution
//! removes files, then grants, then directories. The phases are not atomic:
//! an interruption between them leaves the later phases' rows behind, never
//! a file or grant whose directory was already removed.

use depot_core::effects::{DirectoryStore, FileStore, GrantStore};
use depot_core::{DepotError, DirectoryId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

/// A directory and every descendant, root first in breadth-first order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadePlan {
    /// Directory the cascade was requested for
    pub root: DirectoryId,
    /// Root plus every direct or transitive descendant
    pub directories: Vec<DirectoryId>,
}

impl CascadePlan {
    /// Whether `id` is removed by this plan
    pub fn contains(&self, id: &DirectoryId) -> bool {
        self.directories.contains(id)
    }

    /// Number of directories in the plan
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Never true for a plan produced by [`CascadePlanner`]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Planned ids as an ordered set
    pub fn as_set(&self) -> BTreeSet<DirectoryId> {
        self.directories.iter().cloned().collect()
    }
}

/// Rows removed by a cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    /// File records deleted
    pub files: usize,
    /// Grants deleted
    pub grants: usize,
    /// Directories deleted
    pub directories: usize,
}

/// Enumerates the subtree under a directory
#[derive(Clone)]
pub struct CascadePlanner {
    directories: Arc<dyn DirectoryStore>,
    max_depth: usize,
}

impl CascadePlanner {
    /// Planner over `directories`, descending at most `max_depth` levels
    pub fn new(directories: Arc<dyn DirectoryStore>, max_depth: usize) -> Self {
        Self {
            directories,
            max_depth,
        }
    }

    /// Plan the removal of `root` and its descendants.
    ///
    /// Fails with `NotFound` when `root` is absent and with `DepthExceeded`
    /// when the subtree is deeper than the configured cap.
    pub async fn plan(&self, root: &DirectoryId) -> Result<CascadePlan> {
        if self.directories.get(root).await?.is_none() {
            return Err(DepotError::not_found(format!("directory {root}")));
        }

        let mut visited = HashSet::from([root.clone()]);
        let mut planned = vec![root.clone()];
        let mut queue = VecDeque::from([(root.clone(), 0usize)]);

        while let Some((id, depth)) = queue.pop_front() {
            let children = self.directories.children_of(&id).await?;
            if children.is_empty() {
                continue;
            }
            if depth + 1 > self.max_depth {
                return Err(DepotError::depth_exceeded(self.max_depth));
            }
            for child in children {
                if !visited.insert(child.id.clone()) {
                    tracing::warn!(
                        directory = %child.id,
                        parent = %id,
                        "directory reached twice during cascade planning"
                    );
                    continue;
                }
                planned.push(child.id.clone());
                queue.push_back((child.id, depth + 1));
            }
        }

        Ok(CascadePlan {
            root: root.clone(),
            directories: planned,
        })
    }
}

/// Applies a [`CascadePlan`] to the stores
#[derive(Clone)]
pub struct CascadeExecutor {
    files: Arc<dyn FileStore>,
    grants: Arc<dyn GrantStore>,
    directories: Arc<dyn DirectoryStore>,
}

impl CascadeExecutor {
    /// Executor over the three stores a cascade touches
    pub fn new(
        files: Arc<dyn FileStore>,
        grants: Arc<dyn GrantStore>,
        directories: Arc<dyn DirectoryStore>,
    ) -> Self {
        Self {
            files,
            grants,
            directories,
        }
    }

    /// Delete files, then grants, then directories named by `plan`.
    ///
    /// File bytes in the blob store are left in place.
    pub async fn execute(&self, plan: &CascadePlan) -> Result<CascadeReport> {
        let ids = plan.directories.as_slice();
        let files = self.files.delete_by_directories(ids).await?;
        let grants = self.grants.delete_many(ids).await?;
        let directories = self.directories.delete_many(ids).await?;

        let report = CascadeReport {
            files,
            grants,
            directories,
        };
        tracing::info!(
            root = %plan.root,
            files = report.files,
            grants = report.grants,
            directories = report.directories,
            "cascade delete"
        );
        Ok(report)
    }
}

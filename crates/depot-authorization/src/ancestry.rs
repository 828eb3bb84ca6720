//! Iterative ancestor walk

use depot_core::effects::DirectoryStore;
use depot_core::{DepotError, Directory, DirectoryId, Result};
use std::collections::HashSet;

/// Walks from a directory up through `parent_id` links, target first.
///
/// Parents are fetched lazily, one lookup per step, so a caller that stops
/// early never pays for the rest of the chain. A dangling parent link ends
/// the walk as if the root had been reached. A revisited id ends it too.
/// Climbing more than `limit` parent links above the target is
/// `DepthExceeded`, the same level count the cascade planner uses below a
/// root.
pub struct AncestorWalk<'a> {
    store: &'a dyn DirectoryStore,
    first: Option<Directory>,
    pending_parent: Option<DirectoryId>,
    visited: HashSet<DirectoryId>,
    limit: usize,
}

impl<'a> AncestorWalk<'a> {
    /// Start a walk at `target`
    pub fn new(store: &'a dyn DirectoryStore, target: Directory, limit: usize) -> Self {
        Self {
            store,
            first: Some(target),
            pending_parent: None,
            visited: HashSet::new(),
            limit,
        }
    }

    /// Next directory toward the root, or `None` once the chain ends
    pub async fn next(&mut self) -> Result<Option<Directory>> {
        let directory = if let Some(target) = self.first.take() {
            target
        } else if let Some(parent_id) = self.pending_parent.take() {
            match self.store.get(&parent_id).await? {
                Some(parent) => parent,
                None => {
                    tracing::warn!(
                        parent = %parent_id,
                        "dangling parent link, treating as root"
                    );
                    return Ok(None);
                }
            }
        } else {
            return Ok(None);
        };

        if !self.visited.insert(directory.id.clone()) {
            tracing::warn!(directory = %directory.id, "cycle in parent links, stopping walk");
            return Ok(None);
        }
        // The target itself is level zero.
        if self.visited.len() - 1 > self.limit {
            return Err(DepotError::depth_exceeded(self.limit));
        }

        self.pending_parent.clone_from(&directory.parent_id);
        Ok(Some(directory))
    }

    /// Drain the walk into the full chain of ids, target first
    pub async fn collect_ids(mut self) -> Result<Vec<DirectoryId>> {
        let mut ids = Vec::new();
        while let Some(directory) = self.next().await? {
            ids.push(directory.id);
        }
        Ok(ids)
    }
}

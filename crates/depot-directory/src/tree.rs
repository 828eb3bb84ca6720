//! Directory tree builder
//!
//! Step 1 gathers the principal's visibility set: owned, public, and any
//! directory carrying a grant for the principal, deduplicated by id. A
//! super-admin sees everything.
//!
//! Step 2 nests each visible directory under its parent when the parent is
//! visible too; otherwise it surfaces as a root. Ancestors are never
//! synthesized, so a directory shared deep inside someone else's tree shows
//! up as a root of its own.

use depot_authorization::Principal;
use depot_core::effects::{DirectoryStore, GrantStore};
use depot_core::{Directory, DirectoryId, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// A visible directory with its visible children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// The directory itself
    #[serde(flatten)]
    pub directory: Directory,
    /// Visible children in enumeration order
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    /// Id of this node
    pub fn id(&self) -> &DirectoryId {
        &self.directory.id
    }

    /// Find a node in this subtree
    pub fn find(&self, id: &DirectoryId) -> Option<&DirectoryNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Ids of every node in this subtree
    pub fn ids(&self) -> Vec<DirectoryId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.id().clone());
            stack.extend(node.children.iter());
        }
        ids
    }
}

/// Order-independent shape of a forest: each node with its tree parent.
///
/// Two builds over the same state compare equal here even when the store
/// enumerated directories in a different order.
pub fn forest_shape(forest: &[DirectoryNode]) -> BTreeSet<(DirectoryId, Option<DirectoryId>)> {
    let mut shape = BTreeSet::new();
    let mut stack: Vec<(&DirectoryNode, Option<&DirectoryId>)> =
        forest.iter().map(|root| (root, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        shape.insert((node.id().clone(), parent.cloned()));
        stack.extend(node.children.iter().map(|child| (child, Some(node.id()))));
    }
    shape
}

/// Nest a flat list of directories into a forest.
///
/// A directory whose parent is absent from `directories` becomes a root.
/// Duplicate ids keep their first occurrence. Directories caught in a parent
/// cycle would never be reached from a root; they are surfaced as roots with
/// the cycle edge cut. The traversal is iterative so adversarially deep
/// trees cannot exhaust the stack.
pub fn assemble_forest(directories: Vec<Directory>) -> Vec<DirectoryNode> {
    let mut seen = HashSet::new();
    let mut slots: Vec<Option<Directory>> = directories
        .into_iter()
        .filter(|d| seen.insert(d.id.clone()))
        .map(Some)
        .collect();
    let count = slots.len();

    let index: HashMap<DirectoryId, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.as_ref().map(|d| (d.id.clone(), i)))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for (i, slot) in slots.iter().enumerate() {
        let parent = slot
            .as_ref()
            .and_then(|d| d.parent_id.as_ref())
            .and_then(|p| index.get(p).copied());
        match parent {
            Some(p) if p != i => children[p].push(i),
            _ => roots.push(i),
        }
    }

    // Pre-order walk recording the edges actually taken.
    let mut walk = Walk {
        reached: vec![false; count],
        tree_children: vec![Vec::new(); count],
        order: Vec::with_capacity(count),
    };
    for &root in &roots {
        walk.visit(root, &children);
    }
    let mut orphaned_roots = Vec::new();
    for i in 0..count {
        if !walk.reached[i] {
            if let Some(d) = &slots[i] {
                tracing::warn!(directory = %d.id, "parent cycle in visible set, surfacing as root");
            }
            orphaned_roots.push(i);
            walk.visit(i, &children);
        }
    }
    roots.extend(orphaned_roots);

    // Children precede parents in reversed pre-order.
    let mut built: Vec<Option<DirectoryNode>> = (0..count).map(|_| None).collect();
    for &i in walk.order.iter().rev() {
        let kids = walk.tree_children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        if let Some(directory) = slots[i].take() {
            built[i] = Some(DirectoryNode {
                directory,
                children: kids,
            });
        }
    }
    roots.into_iter().filter_map(|r| built[r].take()).collect()
}

struct Walk {
    reached: Vec<bool>,
    tree_children: Vec<Vec<usize>>,
    order: Vec<usize>,
}

impl Walk {
    fn visit(&mut self, start: usize, children: &[Vec<usize>]) {
        let mut stack = vec![(start, None::<usize>)];
        while let Some((i, parent)) = stack.pop() {
            if self.reached[i] {
                continue;
            }
            self.reached[i] = true;
            self.order.push(i);
            if let Some(p) = parent {
                self.tree_children[p].push(i);
            }
            stack.extend(children[i].iter().rev().map(|&c| (c, Some(i))));
        }
    }
}

/// Builds a principal's visible forest from the stores
#[derive(Clone)]
pub struct DirectoryTreeBuilder {
    directories: Arc<dyn DirectoryStore>,
    grants: Arc<dyn GrantStore>,
}

impl DirectoryTreeBuilder {
    /// Create a builder over the given stores
    pub fn new(directories: Arc<dyn DirectoryStore>, grants: Arc<dyn GrantStore>) -> Self {
        Self {
            directories,
            grants,
        }
    }

    /// Flat visibility set: owned, then public, then shared
    pub async fn visible_directories(&self, principal: &Principal) -> Result<Vec<Directory>> {
        if principal.capabilities().access_all {
            return self.directories.list_all().await;
        }

        let mut visible = self.directories.list_by_owner(&principal.id).await?;
        let mut ids: HashSet<DirectoryId> = visible.iter().map(|d| d.id.clone()).collect();

        for directory in self.directories.list_public().await? {
            if ids.insert(directory.id.clone()) {
                visible.push(directory);
            }
        }

        let shared: Vec<DirectoryId> = self
            .grants
            .list_by_grantee(&principal.id)
            .await?
            .into_iter()
            .map(|g| g.directory_id)
            .filter(|id| !ids.contains(id))
            .collect();
        if !shared.is_empty() {
            for directory in self.directories.get_many(&shared).await? {
                if ids.insert(directory.id.clone()) {
                    visible.push(directory);
                }
            }
        }

        Ok(visible)
    }

    /// Visible forest for `principal`
    pub async fn build_tree(&self, principal: &Principal) -> Result<Vec<DirectoryNode>> {
        let visible = self.visible_directories(principal).await?;
        let total = visible.len();
        let forest = assemble_forest(visible);
        tracing::debug!(
            user = %principal.id,
            directories = total,
            roots = forest.len(),
            "built directory tree"
        );
        Ok(forest)
    }
}

//! Directory lifecycle: create, read, rename, publish and delete

use super::validate_name;
use crate::cascade::{CascadeExecutor, CascadePlanner, CascadeReport};
use crate::depot::DepotHandles;
use crate::tree::{DirectoryNode, DirectoryTreeBuilder};
use depot_authorization::{AuthorizationResolver, Principal};
use depot_core::effects::{DirectoryStore, FileStore, GrantStore, PhysicalTimeEffects};
use depot_core::{
    DepotError, Directory, DirectoryId, DirectoryUpdate, NameConfig, Permission, Result,
};
use serde::{Deserialize, Serialize};
use std::slice;
use std::sync::Arc;

/// Input for [`DirectoryService::create`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDirectory {
    /// Display name, no `/`
    pub name: String,
    /// Parent directory, `None` for a root
    #[serde(default)]
    pub parent_id: Option<DirectoryId>,
    /// Initial public flag
    #[serde(default)]
    pub is_public: bool,
}

/// Input for [`DirectoryService::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New public flag
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// Directory operations with authorization applied
#[derive(Clone)]
pub struct DirectoryService {
    directories: Arc<dyn DirectoryStore>,
    grants: Arc<dyn GrantStore>,
    files: Arc<dyn FileStore>,
    clock: Arc<dyn PhysicalTimeEffects>,
    resolver: AuthorizationResolver,
    tree: DirectoryTreeBuilder,
    planner: CascadePlanner,
    executor: CascadeExecutor,
    max_name_len: usize,
}

impl DirectoryService {
    pub(crate) fn new(
        handles: &DepotHandles,
        resolver: AuthorizationResolver,
        names: &NameConfig,
    ) -> Self {
        Self {
            directories: handles.directories.clone(),
            grants: handles.grants.clone(),
            files: handles.files.clone(),
            clock: handles.clock.clone(),
            tree: DirectoryTreeBuilder::new(handles.directories.clone(), handles.grants.clone()),
            planner: CascadePlanner::new(handles.directories.clone(), resolver.max_depth()),
            executor: CascadeExecutor::new(
                handles.files.clone(),
                handles.grants.clone(),
                handles.directories.clone(),
            ),
            resolver,
            max_name_len: names.max_name_len,
        }
    }

    /// Create a directory owned by `principal`.
    ///
    /// Under a parent the caller does not own, an explicit write grant is
    /// needed; the parent being public is not enough.
    pub async fn create(&self, principal: &Principal, request: NewDirectory) -> Result<Directory> {
        validate_name("directory", &request.name, self.max_name_len)?;
        if !principal.capabilities().write {
            return Err(DepotError::permission_denied(format!(
                "role {} may not create directories",
                principal.role
            )));
        }

        let path = match &request.parent_id {
            Some(parent_id) => {
                let parent = self.directories.get(parent_id).await?.ok_or_else(|| {
                    DepotError::validation(format!("parent directory {parent_id} does not exist"))
                })?;
                if !parent.is_owned_by(&principal.id) && !principal.is_super_admin() {
                    self.resolver
                        .check_ignoring_public(principal, parent_id, Permission::Write)
                        .await?
                        .into_result(parent_id)?;
                }
                parent.child_path(&request.name)
            }
            None => Directory::root_path(&request.name),
        };

        if self
            .directories
            .find_by_owner_and_path(&principal.id, &path)
            .await?
            .is_some()
        {
            return Err(DepotError::conflict(format!(
                "a directory named {} already exists at this location",
                request.name
            )));
        }

        let directory = Directory {
            id: DirectoryId::generate(),
            name: request.name,
            owner_id: principal.id.clone(),
            parent_id: request.parent_id,
            path,
            is_public: request.is_public,
            created_at: self.clock.now().await,
        };
        self.directories.create(directory.clone()).await?;
        tracing::info!(
            directory = %directory.id,
            owner = %directory.owner_id,
            path = %directory.path,
            "directory created"
        );
        Ok(directory)
    }

    /// Fetch a directory the caller may read
    pub async fn get(&self, principal: &Principal, id: &DirectoryId) -> Result<Directory> {
        self.resolver.authorize(principal, id, Permission::Read).await
    }

    /// Flat list of every directory visible to the caller
    pub async fn list(&self, principal: &Principal) -> Result<Vec<Directory>> {
        self.tree.visible_directories(principal).await
    }

    /// Visible directories nested into a forest
    pub async fn tree(&self, principal: &Principal) -> Result<Vec<DirectoryNode>> {
        self.tree.build_tree(principal).await
    }

    /// Rename or change the public flag.
    ///
    /// A rename recomputes this directory's own path. Descendant paths keep
    /// their old prefix.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &DirectoryId,
        patch: DirectoryPatch,
    ) -> Result<Directory> {
        let directory = self.load(id).await?;
        require_owner(principal, &directory, "update")?;

        let mut update = DirectoryUpdate {
            is_public: patch.is_public,
            ..DirectoryUpdate::default()
        };

        if let Some(name) = patch.name.filter(|name| name != &directory.name) {
            validate_name("directory", &name, self.max_name_len)?;
            let path = self.renamed_path(&directory, &name).await?;
            if let Some(existing) = self
                .directories
                .find_by_owner_and_path(&directory.owner_id, &path)
                .await?
            {
                if existing.id != directory.id {
                    return Err(DepotError::conflict(format!(
                        "a directory named {name} already exists at this location"
                    )));
                }
            }
            update.name = Some(name);
            update.path = Some(path);
        }

        if update.is_empty() {
            return Ok(directory);
        }

        let updated = self
            .directories
            .update_fields(id, update)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {id}")))?;
        tracing::info!(
            directory = %updated.id,
            path = %updated.path,
            is_public = updated.is_public,
            "directory updated"
        );
        Ok(updated)
    }

    /// Delete a directory.
    ///
    /// Without `cascade` the directory must have no subdirectories and no
    /// files. With `cascade` its whole subtree goes, files and grants first.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: &DirectoryId,
        cascade: bool,
    ) -> Result<CascadeReport> {
        let directory = self.load(id).await?;
        require_owner(principal, &directory, "delete")?;

        if cascade {
            let plan = self.planner.plan(id).await?;
            return self.executor.execute(&plan).await;
        }

        if !self.directories.children_of(id).await?.is_empty() {
            return Err(DepotError::conflict(format!(
                "directory {id} has subdirectories; delete them first or cascade"
            )));
        }
        if self.files.any_in_directory(id).await? {
            return Err(DepotError::conflict(format!(
                "directory {id} still contains files"
            )));
        }

        let ids = slice::from_ref(id);
        let grants = self.grants.delete_many(ids).await?;
        let directories = self.directories.delete_many(ids).await?;
        tracing::info!(directory = %id, grants, "directory deleted");
        Ok(CascadeReport {
            files: 0,
            grants,
            directories,
        })
    }

    async fn load(&self, id: &DirectoryId) -> Result<Directory> {
        self.directories
            .get(id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {id}")))
    }

    async fn renamed_path(&self, directory: &Directory, name: &str) -> Result<String> {
        let Some(parent_id) = &directory.parent_id else {
            return Ok(Directory::root_path(name));
        };
        Ok(match self.directories.get(parent_id).await? {
            Some(parent) => parent.child_path(name),
            None => {
                // Dangling parent: keep the stored prefix.
                let prefix = directory
                    .path
                    .rsplit_once('/')
                    .map(|(prefix, _)| prefix)
                    .unwrap_or_default();
                format!("{prefix}/{name}")
            }
        })
    }
}

fn require_owner(principal: &Principal, directory: &Directory, action: &str) -> Result<()> {
    if directory.is_owned_by(&principal.id) || principal.is_super_admin() {
        Ok(())
    } else {
        Err(DepotError::permission_denied(format!(
            "only the owner may {action} directory {}",
            directory.id
        )))
    }
}

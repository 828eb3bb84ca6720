//! Composition root
//!
//! Every collaborator arrives as an injected handle; there is no ambient
//! state. Production wiring passes real store handlers, tests pass the
//! in-memory ones.

use crate::cascade::{CascadeExecutor, CascadePlanner};
use crate::services::{
    DirectoryService, FileService, PermissionService, SessionService, UserAdminService,
};
use crate::tree::DirectoryTreeBuilder;
use depot_authorization::AuthorizationResolver;
use depot_core::effects::{
    BlobStore, CredentialService, DirectoryStore, FileStore, GrantStore, PhysicalTimeEffects,
    UserStore,
};
use depot_core::{DepotConfig, Result};
use std::sync::Arc;

/// Handles for every external collaborator
#[derive(Clone)]
pub struct DepotHandles {
    /// Directory persistence
    pub directories: Arc<dyn DirectoryStore>,
    /// Grant persistence
    pub grants: Arc<dyn GrantStore>,
    /// File metadata persistence
    pub files: Arc<dyn FileStore>,
    /// Account persistence
    pub users: Arc<dyn UserStore>,
    /// Object storage for file bytes
    pub blobs: Arc<dyn BlobStore>,
    /// Password and token verification
    pub credentials: Arc<dyn CredentialService>,
    /// Wall clock
    pub clock: Arc<dyn PhysicalTimeEffects>,
}

/// Every engine component and service, wired over one set of handles
#[derive(Clone)]
pub struct Depot {
    /// Validated configuration
    pub config: DepotConfig,
    /// Authorization resolver
    pub resolver: AuthorizationResolver,
    /// Visible-forest builder
    pub tree: DirectoryTreeBuilder,
    /// Subtree enumeration for cascades
    pub planner: CascadePlanner,
    /// Cascade deletion
    pub executor: CascadeExecutor,
    /// Directory lifecycle
    pub directories: DirectoryService,
    /// Grant management
    pub permissions: PermissionService,
    /// File metadata and transfer URLs
    pub files: FileService,
    /// Login and token resolution
    pub sessions: SessionService,
    /// Account administration
    pub users: UserAdminService,
}

impl Depot {
    /// Validate `config` and wire every component over `handles`
    pub fn new(handles: DepotHandles, config: DepotConfig) -> Result<Self> {
        config.validate()?;
        let resolver = AuthorizationResolver::new(
            handles.directories.clone(),
            handles.grants.clone(),
            &config.authorization,
        );
        tracing::debug!(
            max_traversal_depth = config.authorization.max_traversal_depth,
            "depot wired"
        );
        Ok(Self {
            tree: DirectoryTreeBuilder::new(handles.directories.clone(), handles.grants.clone()),
            planner: CascadePlanner::new(
                handles.directories.clone(),
                config.authorization.max_traversal_depth,
            ),
            executor: CascadeExecutor::new(
                handles.files.clone(),
                handles.grants.clone(),
                handles.directories.clone(),
            ),
            directories: DirectoryService::new(&handles, resolver.clone(), &config.names),
            permissions: PermissionService::new(&handles, resolver.clone()),
            files: FileService::new(&handles, resolver.clone(), &config),
            sessions: SessionService::new(&handles),
            users: UserAdminService::new(&handles),
            resolver,
            config,
        })
    }
}

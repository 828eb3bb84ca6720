//! Authorization resolver
//!
//! Combines the role policy, ownership, the public flag and directory
//! grants into one decision. Every input is read from the injected stores
//! on each call; nothing is cached between calls.

use crate::ancestry::AncestorWalk;
use crate::decision::{AccessBasis, AccessDecision, DenialReason};
use crate::principal::Principal;
use depot_core::effects::{DirectoryStore, GrantStore};
use depot_core::{
    AuthorizationConfig, DepotError, Directory, DirectoryId, Permission, PermissionGrant,
    PermissionSet, Result,
};
use std::sync::Arc;

/// Whether the public flag participates in a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicAccess {
    /// Public directories allow read and write
    Honor,
    /// Skip the public fast-path
    Ignore,
}

/// Computes effective access for `(principal, directory, action)`
#[derive(Clone)]
pub struct AuthorizationResolver {
    directories: Arc<dyn DirectoryStore>,
    grants: Arc<dyn GrantStore>,
    max_depth: usize,
}

impl AuthorizationResolver {
    /// Create a resolver over the given stores
    pub fn new(
        directories: Arc<dyn DirectoryStore>,
        grants: Arc<dyn GrantStore>,
        config: &AuthorizationConfig,
    ) -> Self {
        Self {
            directories,
            grants,
            max_depth: config.max_traversal_depth,
        }
    }

    /// Configured ancestor walk cap
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Full decision for `action` on `directory_id`
    pub async fn check(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
    ) -> Result<AccessDecision> {
        self.check_with(principal, directory_id, action, PublicAccess::Honor)
            .await
    }

    /// Same as [`check`](Self::check) without the public fast-path.
    ///
    /// Creating a subdirectory under someone else's public directory still
    /// needs ownership or an explicit write grant.
    pub async fn check_ignoring_public(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
    ) -> Result<AccessDecision> {
        self.check_with(principal, directory_id, action, PublicAccess::Ignore)
            .await
    }

    /// Decision with explicit public-flag handling
    pub async fn check_with(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
        public: PublicAccess,
    ) -> Result<AccessDecision> {
        match self.directories.get(directory_id).await? {
            Some(directory) => self.decide(principal, &directory, action, public).await,
            None => {
                tracing::debug!(
                    user = %principal.id,
                    directory = %directory_id,
                    action = %action,
                    decision = "target_not_found",
                    "authorization decision"
                );
                Ok(AccessDecision::TargetNotFound)
            }
        }
    }

    /// Decision for a directory the caller already loaded
    pub async fn check_directory(
        &self,
        principal: &Principal,
        directory: &Directory,
        action: Permission,
    ) -> Result<AccessDecision> {
        self.decide(principal, directory, action, PublicAccess::Honor)
            .await
    }

    /// Boolean view: `TargetNotFound` and denials are both `false`
    pub async fn can_access(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
    ) -> Result<bool> {
        Ok(self.check(principal, directory_id, action).await?.is_allowed())
    }

    /// Load the directory and require `action` on it.
    ///
    /// A missing target is `NotFound`, a refusal is `PermissionDenied`.
    pub async fn authorize(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
    ) -> Result<Directory> {
        let directory = self
            .directories
            .get(directory_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {directory_id}")))?;
        self.check_directory(principal, &directory, action)
            .await?
            .into_result(directory_id)?;
        Ok(directory)
    }

    /// Capability set that applies to `principal` on `directory_id`.
    ///
    /// Global override and ownership yield the full set; otherwise the
    /// nearest grant's set, or the empty set when there is none. Used for
    /// display, not enforcement: public access and the role ceiling are not
    /// folded in.
    pub async fn effective_permissions(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
    ) -> Result<PermissionSet> {
        let directory = self
            .directories
            .get(directory_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {directory_id}")))?;

        if principal.capabilities().access_all || directory.is_owned_by(&principal.id) {
            return Ok(PermissionSet::full());
        }
        Ok(self
            .nearest_grant(principal, directory)
            .await?
            .map(|grant| grant.permissions)
            .unwrap_or_default())
    }

    /// Whether `directory` belongs in the principal's tree view.
    ///
    /// Any grant anchored exactly at the directory counts, whatever its
    /// capability set. Inherited grants do not.
    pub async fn can_view(&self, principal: &Principal, directory: &Directory) -> Result<bool> {
        if principal.capabilities().access_all
            || directory.is_public
            || directory.is_owned_by(&principal.id)
        {
            return Ok(true);
        }
        Ok(self
            .grants
            .find(&principal.id, &directory.id)
            .await?
            .is_some())
    }

    /// Ids from `directory_id` up to its root, target first
    pub async fn ancestor_chain(&self, directory_id: &DirectoryId) -> Result<Vec<DirectoryId>> {
        let directory = self
            .directories
            .get(directory_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {directory_id}")))?;
        AncestorWalk::new(self.directories.as_ref(), directory, self.max_depth)
            .collect_ids()
            .await
    }

    async fn decide(
        &self,
        principal: &Principal,
        directory: &Directory,
        action: Permission,
        public: PublicAccess,
    ) -> Result<AccessDecision> {
        let decision = self.evaluate(principal, directory, action, public).await?;
        tracing::debug!(
            user = %principal.id,
            directory = %directory.id,
            action = %action,
            decision = decision.label(),
            "authorization decision"
        );
        Ok(decision)
    }

    async fn evaluate(
        &self,
        principal: &Principal,
        directory: &Directory,
        action: Permission,
        public: PublicAccess,
    ) -> Result<AccessDecision> {
        let capabilities = principal.capabilities();

        if capabilities.access_all {
            return Ok(AccessDecision::Allowed(AccessBasis::GlobalOverride));
        }

        if public == PublicAccess::Honor && directory.is_public && action != Permission::Delete {
            return Ok(AccessDecision::Allowed(AccessBasis::Public));
        }

        if directory.is_owned_by(&principal.id) {
            return Ok(AccessDecision::Allowed(AccessBasis::Owner));
        }

        // Role is a ceiling: grants narrow within it, never above it.
        if !capabilities.allows(action) {
            return Ok(AccessDecision::Denied(DenialReason::RoleCeiling {
                role: principal.role,
                action,
            }));
        }

        Ok(match self.nearest_grant(principal, directory.clone()).await? {
            Some(grant) if grant.allows(action) => AccessDecision::Allowed(AccessBasis::Grant {
                at: grant.directory_id,
            }),
            Some(grant) => AccessDecision::Denied(DenialReason::GrantLacksPermission {
                at: grant.directory_id,
                action,
            }),
            None => AccessDecision::Denied(DenialReason::NoGrant),
        })
    }

    /// First grant for the principal on the chain from `target` to the root
    async fn nearest_grant(
        &self,
        principal: &Principal,
        target: Directory,
    ) -> Result<Option<PermissionGrant>> {
        let mut walk = AncestorWalk::new(self.directories.as_ref(), target, self.max_depth);
        while let Some(directory) = walk.next().await? {
            if let Some(grant) = self.grants.find(&principal.id, &directory.id).await? {
                return Ok(Some(grant));
            }
        }
        Ok(None)
    }
}

//! Grant management on owned directories

use crate::depot::DepotHandles;
use depot_authorization::{AccessDecision, AuthorizationResolver, Principal};
use depot_core::effects::{DirectoryStore, GrantStore, PhysicalTimeEffects, UserStore};
use depot_core::{
    DepotError, Directory, DirectoryId, Permission, PermissionGrant, PermissionSet, Result,
    UserId,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input for [`PermissionService::grant`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    /// Grantee's account email
    pub user_email: String,
    /// Replaces any set the grantee already holds here
    pub permissions: PermissionSet,
}

/// A grant with the grantee's email joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantListing {
    /// The stored grant
    #[serde(flatten)]
    pub grant: PermissionGrant,
    /// Grantee's email, `"unknown"` once the account is gone
    pub user_email: String,
}

/// Owner-managed grants
#[derive(Clone)]
pub struct PermissionService {
    directories: Arc<dyn DirectoryStore>,
    grants: Arc<dyn GrantStore>,
    users: Arc<dyn UserStore>,
    clock: Arc<dyn PhysicalTimeEffects>,
    resolver: AuthorizationResolver,
}

impl PermissionService {
    pub(crate) fn new(handles: &DepotHandles, resolver: AuthorizationResolver) -> Self {
        Self {
            directories: handles.directories.clone(),
            grants: handles.grants.clone(),
            users: handles.users.clone(),
            clock: handles.clock.clone(),
            resolver,
        }
    }

    /// Grant or replace the grantee's capability set on `directory_id`.
    ///
    /// Only the owner grants; a super-admin who does not own the directory
    /// is refused too.
    pub async fn grant(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        request: GrantRequest,
    ) -> Result<PermissionGrant> {
        self.owned(principal, directory_id, "grant permissions on")
            .await?;

        let grantee = self
            .users
            .find_by_email(&request.user_email)
            .await?
            .ok_or_else(|| {
                DepotError::validation(format!("no account with email {}", request.user_email))
            })?;
        if grantee.id == principal.id {
            return Err(DepotError::validation("cannot grant permissions to yourself"));
        }

        let now = self.clock.now().await;
        let grant = self
            .grants
            .upsert(
                &grantee.id,
                directory_id,
                request.permissions,
                &principal.id,
                now,
            )
            .await?;
        tracing::info!(
            directory = %directory_id,
            grantee = %grantee.id,
            permissions = %grant.permissions,
            "permissions granted"
        );
        Ok(grant)
    }

    /// Remove the grantee's grant on `directory_id`
    pub async fn revoke(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        grantee: &UserId,
    ) -> Result<()> {
        self.owned(principal, directory_id, "revoke permissions on")
            .await?;
        if !self.grants.delete_one(grantee, directory_id).await? {
            return Err(DepotError::not_found(format!(
                "grant for {grantee} on directory {directory_id}"
            )));
        }
        tracing::info!(directory = %directory_id, grantee = %grantee, "permissions revoked");
        Ok(())
    }

    /// Grants anchored at `directory_id`, owner only
    pub async fn list(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
    ) -> Result<Vec<GrantListing>> {
        self.owned(principal, directory_id, "list permissions on")
            .await?;
        let grants = self.grants.list_by_directory(directory_id).await?;
        let mut listings = Vec::with_capacity(grants.len());
        for grant in grants {
            let user_email = self
                .users
                .get(&grant.user_id)
                .await?
                .map(|user| user.email)
                .unwrap_or_else(|| "unknown".to_string());
            listings.push(GrantListing { grant, user_email });
        }
        Ok(listings)
    }

    /// The caller's own decision for `action` on `directory_id`
    pub async fn check(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: Permission,
    ) -> Result<AccessDecision> {
        self.resolver.check(principal, directory_id, action).await
    }

    /// The caller's own capability set on `directory_id`
    pub async fn effective(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
    ) -> Result<PermissionSet> {
        self.resolver
            .effective_permissions(principal, directory_id)
            .await
    }

    async fn owned(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
        action: &str,
    ) -> Result<Directory> {
        let directory = self
            .directories
            .get(directory_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {directory_id}")))?;
        if !directory.is_owned_by(&principal.id) {
            return Err(DepotError::permission_denied(format!(
                "only the owner may {action} directory {directory_id}"
            )));
        }
        Ok(directory)
    }
}

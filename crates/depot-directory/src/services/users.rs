//! Account administration for roles holding `manage_users`

use crate::depot::DepotHandles;
use depot_authorization::Principal;
use depot_core::effects::UserStore;
use depot_core::{DepotError, Result, Role, User, UserId, UserUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Largest page [`UserAdminService::list`] returns
pub const MAX_PAGE_SIZE: usize = 100;

/// Input for [`UserAdminService::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New role
    #[serde(default)]
    pub role: Option<Role>,
    /// Activate or deactivate
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New email, super-admin only
    #[serde(default)]
    pub email: Option<String>,
}

/// User management
#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserStore>,
}

impl UserAdminService {
    pub(crate) fn new(handles: &DepotHandles) -> Self {
        Self {
            users: handles.users.clone(),
        }
    }

    /// Page through accounts; `limit` must be in `1..=100`
    pub async fn list(&self, principal: &Principal, skip: usize, limit: usize) -> Result<Vec<User>> {
        require_manager(principal)?;
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(DepotError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        self.users.list(skip, limit).await
    }

    /// Fetch one account
    pub async fn get(&self, principal: &Principal, id: &UserId) -> Result<User> {
        require_manager(principal)?;
        self.load(id).await
    }

    /// Change role, active flag or email
    pub async fn update(&self, principal: &Principal, id: &UserId, patch: UserPatch) -> Result<User> {
        require_manager(principal)?;
        let target = self.load(id).await?;
        guard_super_admin(principal, &target)?;

        if patch.is_active == Some(false) && id == &principal.id {
            return Err(DepotError::validation("cannot deactivate your own account"));
        }
        if patch.role == Some(Role::SuperAdmin) && !principal.is_super_admin() {
            return Err(DepotError::permission_denied(
                "only a super-admin may grant the super_admin role",
            ));
        }
        if let Some(email) = &patch.email {
            if !principal.is_super_admin() {
                return Err(DepotError::permission_denied(
                    "only a super-admin may change an email address",
                ));
            }
            if !email.contains('@') {
                return Err(DepotError::validation(format!("invalid email {email}")));
            }
        }

        let update = UserUpdate {
            role: patch.role,
            is_active: patch.is_active,
            email: patch.email,
        };
        if update.is_empty() {
            return Ok(target);
        }
        let updated = self
            .users
            .update(id, update)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("user {id}")))?;
        tracing::info!(
            user = %updated.id,
            role = %updated.role,
            is_active = updated.is_active,
            by = %principal.id,
            "user updated"
        );
        Ok(updated)
    }

    /// Remove an account other than the caller's own
    pub async fn delete(&self, principal: &Principal, id: &UserId) -> Result<()> {
        require_manager(principal)?;
        if id == &principal.id {
            return Err(DepotError::validation("cannot delete your own account"));
        }
        let target = self.load(id).await?;
        guard_super_admin(principal, &target)?;
        if !self.users.delete(id).await? {
            return Err(DepotError::not_found(format!("user {id}")));
        }
        tracing::info!(user = %id, by = %principal.id, "user deleted");
        Ok(())
    }

    async fn load(&self, id: &UserId) -> Result<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("user {id}")))
    }
}

fn require_manager(principal: &Principal) -> Result<()> {
    if principal.capabilities().manage_users {
        Ok(())
    } else {
        Err(DepotError::permission_denied(format!(
            "role {} may not manage users",
            principal.role
        )))
    }
}

// Admins manage everyone below super-admin.
fn guard_super_admin(principal: &Principal, target: &User) -> Result<()> {
    if target.role == Role::SuperAdmin && !principal.is_super_admin() {
        return Err(DepotError::permission_denied(
            "only a super-admin may modify a super-admin account",
        ));
    }
    Ok(())
}

use crate::identifiers::UserId;
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account as seen by the core. Credential material lives with the
/// credential service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Unique email
    pub email: String,
    /// Current role
    pub role: Role,
    /// Deactivated accounts cannot act
    pub is_active: bool,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Administrative account update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New role
    pub role: Option<Role>,
    /// New active flag
    pub is_active: Option<bool>,
    /// New email
    pub email: Option<String>,
}

impl UserUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.is_active.is_none() && self.email.is_none()
    }

    /// Apply onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
    }
}

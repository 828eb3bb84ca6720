//! Requesting principal

use depot_core::{Role, RoleCapabilities, User, UserId};
use serde::{Deserialize, Serialize};

/// Who is asking, with the role read fresh for this request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account id
    pub id: UserId,
    /// Role at request time
    pub role: Role,
}

impl Principal {
    /// Build from an id and role
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Role capabilities
    pub fn capabilities(&self) -> RoleCapabilities {
        self.role.capabilities()
    }

    /// Whether the principal bypasses directory checks
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
        }
    }
}

//! Static role policy.
//!
//! A role confers coarse capabilities independent of any directory. The
//! resolver consults `access_all` before anything else and treats the
//! read/write/delete flags as a ceiling that directory grants cannot raise.

use crate::errors::DepotError;
use crate::permission::Permission;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Global override over every directory
    SuperAdmin,
    /// User management, full directory capabilities
    Admin,
    /// Default account; may not delete
    User,
    /// Registered but not yet approved
    Pending,
}

impl Role {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::User => "user",
            Role::Pending => "pending",
        }
    }

    /// Capabilities conferred by this role.
    pub fn capabilities(self) -> RoleCapabilities {
        capabilities(self)
    }

    /// Whether this role bypasses directory checks entirely.
    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DepotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "pending" => Ok(Role::Pending),
            other => Err(DepotError::validation(format!("unknown role: {other}"))),
        }
    }
}

/// Coarse capabilities attached to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCapabilities {
    /// May read directories it can otherwise reach
    pub read: bool,
    /// May write directories it can otherwise reach
    pub write: bool,
    /// May delete in directories it can otherwise reach
    pub delete: bool,
    /// May administer user accounts
    pub manage_users: bool,
    /// Reaches every directory
    pub access_all: bool,
}

impl RoleCapabilities {
    /// Whether the role ceiling admits `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::Read => self.read,
            Permission::Write => self.write,
            Permission::Delete => self.delete,
        }
    }
}

/// Fixed role table.
pub fn capabilities(role: Role) -> RoleCapabilities {
    match role {
        Role::SuperAdmin => RoleCapabilities {
            read: true,
            write: true,
            delete: true,
            manage_users: true,
            access_all: true,
        },
        Role::Admin => RoleCapabilities {
            read: true,
            write: true,
            delete: true,
            manage_users: true,
            access_all: false,
        },
        Role::User => RoleCapabilities {
            read: true,
            write: true,
            delete: false,
            manage_users: false,
            access_all: false,
        },
        Role::Pending => RoleCapabilities {
            read: false,
            write: false,
            delete: false,
            manage_users: false,
            access_all: false,
        },
    }
}

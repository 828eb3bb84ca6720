//! Authorization decisions

use depot_core::{DepotError, DirectoryId, Permission, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which authority source allowed access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum AccessBasis {
    /// Role carries `access_all`
    GlobalOverride,
    /// Target directory is public
    Public,
    /// Principal owns the target
    Owner,
    /// Nearest grant on the ancestor chain
    Grant {
        /// Directory the grant is anchored at
        at: DirectoryId,
    },
}

/// Why access was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenialReason {
    /// Role lacks the coarse capability, whatever grants exist
    RoleCeiling {
        /// Principal's role
        role: Role,
        /// Requested action
        action: Permission,
    },
    /// Nearest grant exists but lacks the action; farther grants are ignored
    GrantLacksPermission {
        /// Directory the authoritative grant is anchored at
        at: DirectoryId,
        /// Requested action
        action: Permission,
    },
    /// No grant anywhere on the ancestor chain
    NoGrant,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::RoleCeiling { role, action } => {
                write!(f, "role {role} does not carry {action} capability")
            }
            DenialReason::GrantLacksPermission { at, action } => {
                write!(f, "grant at directory {at} does not include {action}")
            }
            DenialReason::NoGrant => f.write_str("no grant on this directory or its ancestors"),
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Access allowed
    Allowed(AccessBasis),
    /// Access refused
    Denied(DenialReason),
    /// Target directory does not exist
    TargetNotFound,
}

impl AccessDecision {
    /// Whether access is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allowed(_) => "allowed",
            Self::Denied(_) => "denied",
            Self::TargetNotFound => "target_not_found",
        }
    }

    /// Convert to a `Result`, naming `directory` in the error
    pub fn into_result(self, directory: &DirectoryId) -> Result<AccessBasis, DepotError> {
        match self {
            Self::Allowed(basis) => Ok(basis),
            Self::Denied(reason) => Err(DepotError::permission_denied(format!(
                "directory {directory}: {reason}"
            ))),
            Self::TargetNotFound => Err(DepotError::not_found(format!("directory {directory}"))),
        }
    }
}

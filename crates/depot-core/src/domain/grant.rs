use crate::identifiers::{DirectoryId, GrantId, UserId};
use crate::permission::{Permission, PermissionSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory-scoped ACL entry for one grantee.
///
/// At most one grant exists per `(user_id, directory_id)`; granting again
/// replaces `permissions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Unique identifier
    pub id: GrantId,
    /// Grantee
    pub user_id: UserId,
    /// Directory the grant is anchored at
    pub directory_id: DirectoryId,
    /// Capabilities conferred
    pub permissions: PermissionSet,
    /// Granter
    pub granted_by: UserId,
    /// Creation time of the first grant for this pair
    pub created_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// Whether the grant confers `permission`.
    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

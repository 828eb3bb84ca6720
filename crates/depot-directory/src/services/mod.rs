//! Application services
//!
//! Each service takes the resolved [`Principal`](depot_authorization::Principal)
//! of the caller and validates input before touching any store.

mod directories;
mod files;
mod permissions;
mod sessions;
mod users;

pub use directories::{DirectoryPatch, DirectoryService, NewDirectory};
pub use files::{DownloadTicket, FileService, UploadRequest, UploadTicket};
pub use permissions::{GrantListing, GrantRequest, PermissionService};
pub use sessions::SessionService;
pub use users::{UserAdminService, UserPatch};

use depot_core::{DepotError, Result};

/// Reject empty names, names with a path separator, and names longer than
/// `max_len` characters.
pub(crate) fn validate_name(kind: &str, name: &str, max_len: usize) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DepotError::validation(format!("{kind} name must not be empty")));
    }
    if name.contains('/') {
        return Err(DepotError::validation(format!(
            "{kind} name must not contain '/'"
        )));
    }
    if name.chars().count() > max_len {
        return Err(DepotError::validation(format!(
            "{kind} name longer than {max_len} characters"
        )));
    }
    Ok(())
}

//! Persisted entities.
//!
//! Each entity is a plain struct with serde derives; handlers store them as
//! documents and services reconstruct them whole. Partial updates travel as
//! the `*Update` types so a handler can apply them atomically per document.

mod directory;
mod file;
mod grant;
mod user;

pub use directory::{Directory, DirectoryUpdate};
pub use file::{FileRecord, FileUpdate};
pub use grant::PermissionGrant;
pub use user::{User, UserUpdate};

//! Effect trait definitions
//!
//! Pure trait definitions for every external collaborator the core talks to.
//! This module defines **what** can be done; handlers in `depot-store` (or a
//! production persistence layer) define **how**.
//!
//! All operations are atomic at the single-document level only. Nothing here
//! promises a transaction spanning several documents, so callers sequence
//! multi-entity mutations themselves.
//!
//! Handles are injected into the resolver and services as `Arc<dyn Trait>`;
//! there is no ambient global state.

pub mod blob;
pub mod credential;
pub mod directory;
pub mod file;
pub mod grant;
pub mod time;
pub mod user;

pub use blob::{BlobStore, Disposition};
pub use credential::{Authenticated, CredentialService, Credentials, TokenClaims, TokenType};
pub use directory::DirectoryStore;
pub use file::FileStore;
pub use grant::GrantStore;
pub use time::PhysicalTimeEffects;
pub use user::UserStore;

//! # Depot Core - Layer 1: Foundation
//!
//! **Purpose**: Define the vocabulary every other Depot crate speaks.
//!
//! - Strongly typed identifiers for users, directories, files and grants
//! - Persisted entities (directories, files, permission grants, users)
//! - The static role policy and directory-scoped permission kinds
//! - A single error type shared by handlers and services
//! - Effect traits for every external collaborator (stores, blob storage,
//!   credential service, clock)
//!
//! ## What's NOT in this crate
//!
//! - Effect handler implementations (belong in `depot-store`)
//! - Authorization decisions (belong in `depot-authorization`)
//! - Tree assembly, cascade deletion and services (belong in `depot-directory`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Runtime configuration loaded from TOML and the environment
pub mod config;

/// Strict decoding of persisted records
pub mod decode;

/// Persisted entities
pub mod domain;

/// Effect traits for external collaborators
pub mod effects;

/// Unified error type
pub mod errors;

/// Identifier newtypes
pub mod identifiers;

/// Directory-scoped permission kinds and capability sets
pub mod permission;

/// Static role policy
pub mod role;

pub use config::{AuthorizationConfig, DepotConfig, NameConfig, UploadConfig};
pub use decode::decode_record;
pub use domain::{
    Directory, DirectoryUpdate, FileRecord, FileUpdate, PermissionGrant, User, UserUpdate,
};
pub use errors::{DepotError, Result};
pub use identifiers::{DirectoryId, FileId, GrantId, UserId};
pub use permission::{Permission, PermissionSet};
pub use role::{capabilities, Role, RoleCapabilities};

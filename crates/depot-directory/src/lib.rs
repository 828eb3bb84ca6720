//! # Depot Directory - Layer 4: Trees, Cascades and Services
//!
//! - [`tree`]: reconstructs a user's visible directory forest from a flat
//!   collection (owned, public, shared)
//! - [`cascade`]: plans and executes deletion of a directory with every
//!   descendant, file and grant beneath it
//! - [`services`]: the action surface (directories, grants, files, sessions,
//!   user administration) with authorization applied at each entry point
//! - [`Depot`]: composition root wiring injected handles into the services

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cascade;
pub mod depot;
pub mod services;
pub mod tree;

pub use cascade::{CascadeExecutor, CascadePlan, CascadePlanner, CascadeReport};
pub use depot::{Depot, DepotHandles};
pub use services::{
    DirectoryPatch, DirectoryService, DownloadTicket, FileService, GrantListing, GrantRequest,
    NewDirectory, PermissionService, SessionService, UploadRequest, UploadTicket,
    UserAdminService, UserPatch,
};
pub use tree::{assemble_forest, forest_shape, DirectoryNode, DirectoryTreeBuilder};

//! # Depot Store - Layer 2: In-Memory Handlers
//!
//! Implementations of the `depot-core` effect traits backed by process
//! memory. They enforce the same uniqueness indexes a document store would
//! (directory `(owner_id, path)`, grant `(user_id, directory_id)`, file
//! `storage_key`, user `email`) and report collisions as `Conflict`.
//!
//! Enumeration order is insertion order, which makes test fixtures
//! deterministic without callers depending on it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// In-memory blob store
pub mod blob;

/// Token table credential service
pub mod credential;

/// Document stores
pub mod memory;

/// JSON state snapshots
pub mod snapshot;

/// Clock handlers
pub mod time;

pub use blob::MemoryBlobStore;
pub use credential::MemoryCredentialService;
pub use memory::{MemoryDirectoryStore, MemoryFileStore, MemoryGrantStore, MemoryUserStore};
pub use snapshot::{MemoryBackend, StateSnapshot};
pub use time::{FixedClock, SystemClock};

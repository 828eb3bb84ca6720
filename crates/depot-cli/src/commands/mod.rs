// Command handlers. Each returns a JSON value for main to print.

pub mod cascade;
pub mod check;
pub mod tree;

use anyhow::Context;
use depot_authorization::Principal;
use depot_core::effects::UserStore;
use depot_core::{DepotConfig, UserId};
use depot_directory::{Depot, DepotHandles};
use depot_store::{
    MemoryBackend, MemoryBlobStore, MemoryCredentialService, StateSnapshot, SystemClock,
};
use std::path::Path;
use std::sync::Arc;

/// A depot wired over in-memory stores loaded from a snapshot
pub struct Session {
    pub backend: MemoryBackend,
    pub depot: Depot,
}

impl Session {
    /// Load config (or defaults) and the state snapshot
    pub async fn open(config: Option<&Path>, state: &Path) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => DepotConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => {
                let mut config = DepotConfig::default();
                config.merge_with_env()?;
                config
            }
        };
        let content = std::fs::read_to_string(state)
            .with_context(|| format!("reading state {}", state.display()))?;
        let snapshot = StateSnapshot::from_json_str(&content)
            .with_context(|| format!("parsing state {}", state.display()))?;
        tracing::debug!(state = %state.display(), "state snapshot parsed");
        Self::from_parts(config, snapshot).await
    }

    pub async fn from_parts(config: DepotConfig, snapshot: StateSnapshot) -> anyhow::Result<Self> {
        let backend = MemoryBackend::from_snapshot(snapshot).await?;
        let clock = Arc::new(SystemClock);
        let handles = DepotHandles {
            directories: Arc::new(backend.directories.clone()),
            grants: Arc::new(backend.grants.clone()),
            files: Arc::new(backend.files.clone()),
            users: Arc::new(backend.users.clone()),
            blobs: Arc::new(MemoryBlobStore::default()),
            credentials: Arc::new(MemoryCredentialService::new(clock.clone())),
            clock,
        };
        let depot = Depot::new(handles, config)?;
        Ok(Self { backend, depot })
    }

    /// Principal for a user id in the snapshot, with its stored role
    pub async fn principal(&self, user: &str) -> anyhow::Result<Principal> {
        let id = UserId::from(user);
        let user = self
            .backend
            .users
            .get(&id)
            .await?
            .with_context(|| format!("no user {id} in state"))?;
        Ok(Principal::from(&user))
    }
}

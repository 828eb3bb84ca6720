//! # Depot Testkit - Layer 8: Shared Fixtures
//!
//! [`TestWorld`] wires the in-memory handlers from `depot-store` behind a
//! full [`Depot`] and offers scenario helpers that write straight to the
//! stores, bypassing service-level validation. Use the services themselves
//! when the validation is what the test is about.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, TimeZone, Utc};
use depot_authorization::{AuthorizationResolver, Principal};
use depot_core::effects::{
    CredentialService, Credentials, DirectoryStore, FileStore, GrantStore, PhysicalTimeEffects,
    TokenClaims, TokenType, UserStore,
};
use depot_core::{
    DepotConfig, Directory, DirectoryId, FileId, FileRecord, PermissionGrant, PermissionSet, Role,
    User, UserId, UserUpdate,
};
use depot_directory::{Depot, DepotHandles};
use depot_store::{
    FixedClock, MemoryBackend, MemoryBlobStore, MemoryCredentialService, StateSnapshot,
};
use std::sync::{Arc, Once};

/// Password registered for every user created by [`TestWorld::add_user`]
pub const TEST_PASSWORD: &str = "password";

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG`, once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Instant every world's clock starts at
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Every in-memory handler plus the depot wired over them
pub struct TestWorld {
    pub backend: MemoryBackend,
    pub blobs: MemoryBlobStore,
    pub clock: FixedClock,
    pub credentials: MemoryCredentialService,
    pub depot: Depot,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// World with the default configuration
    pub fn new() -> Self {
        Self::with_config(DepotConfig::default())
    }

    /// World with a custom configuration
    pub fn with_config(config: DepotConfig) -> Self {
        init_tracing();
        let backend = MemoryBackend::new();
        let blobs = MemoryBlobStore::default();
        let clock = FixedClock::new(epoch());
        let credentials = MemoryCredentialService::new(Arc::new(clock.clone()));
        let handles = DepotHandles {
            directories: Arc::new(backend.directories.clone()),
            grants: Arc::new(backend.grants.clone()),
            files: Arc::new(backend.files.clone()),
            users: Arc::new(backend.users.clone()),
            blobs: Arc::new(blobs.clone()),
            credentials: Arc::new(credentials.clone()),
            clock: Arc::new(clock.clone()),
        };
        let depot = Depot::new(handles, config).expect("test config is valid");
        Self {
            backend,
            blobs,
            clock,
            credentials,
            depot,
        }
    }

    /// World preloaded from a JSON state snapshot
    pub async fn from_snapshot(snapshot: StateSnapshot) -> Self {
        let world = Self::new();
        world.backend.load(snapshot).await.expect("snapshot loads");
        world
    }

    pub fn resolver(&self) -> &AuthorizationResolver {
        &self.depot.resolver
    }

    /// Create an active account and register its login
    pub async fn add_user(&self, email: &str, role: Role) -> Principal {
        let user = User {
            id: UserId::generate(),
            email: email.to_string(),
            role,
            is_active: true,
            created_at: self.clock_now().await,
        };
        self.backend.users.create(user.clone()).await.expect("unique user");
        let login = Credentials {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        };
        self.credentials
            .register(&user.id, role, &login)
            .await
            .expect("unique login");
        Principal::from(&user)
    }

    pub async fn deactivate(&self, principal: &Principal) {
        self.backend
            .users
            .update(
                &principal.id,
                UserUpdate {
                    is_active: Some(false),
                    ..UserUpdate::default()
                },
            )
            .await
            .expect("update user")
            .expect("user exists");
    }

    /// Mint an unexpired access token for `principal`
    pub async fn access_token(&self, principal: &Principal) -> String {
        let expires_at = self.clock_now().await + chrono::Duration::minutes(30);
        self.credentials
            .issue(TokenClaims {
                subject: principal.id.clone(),
                token_type: TokenType::Access,
                expires_at,
            })
            .await
    }

    /// Insert a private directory owned by `owner`
    pub async fn add_dir(
        &self,
        owner: &Principal,
        name: &str,
        parent: Option<&Directory>,
    ) -> Directory {
        self.insert_dir(owner, name, parent, false).await
    }

    /// Insert a public directory owned by `owner`
    pub async fn add_public_dir(
        &self,
        owner: &Principal,
        name: &str,
        parent: Option<&Directory>,
    ) -> Directory {
        self.insert_dir(owner, name, parent, true).await
    }

    /// Insert a chain `root/level1/.../level{depth-1}`, root first
    pub async fn add_chain(&self, owner: &Principal, depth: usize) -> Vec<Directory> {
        let mut chain: Vec<Directory> = Vec::with_capacity(depth);
        for level in 0..depth {
            let name = if level == 0 {
                "root".to_string()
            } else {
                format!("level{level}")
            };
            let directory = self.add_dir(owner, &name, chain.last()).await;
            chain.push(directory);
        }
        chain
    }

    /// Insert a directory whose parent link points nowhere
    pub async fn add_dangling_dir(
        &self,
        owner: &Principal,
        name: &str,
        missing_parent: &str,
    ) -> Directory {
        let directory = Directory {
            id: DirectoryId::generate(),
            name: name.to_string(),
            owner_id: owner.id.clone(),
            parent_id: Some(DirectoryId::from(missing_parent)),
            path: format!("/{missing_parent}/{name}"),
            is_public: false,
            created_at: self.clock_now().await,
        };
        self.backend.directories.put_unchecked(directory.clone()).await;
        directory
    }

    /// Upsert a grant on `directory` for `grantee`, granted by the owner
    pub async fn grant(
        &self,
        grantee: &Principal,
        directory: &Directory,
        permissions: impl Into<PermissionSet>,
    ) -> PermissionGrant {
        let now = self.clock_now().await;
        self.backend
            .grants
            .upsert(
                &grantee.id,
                &directory.id,
                permissions.into(),
                &directory.owner_id,
                now,
            )
            .await
            .expect("grant upsert")
    }

    /// Insert a confirmed file with its blob present
    pub async fn add_file(&self, owner: &Principal, directory: &Directory, name: &str) -> FileRecord {
        let file = FileRecord {
            id: FileId::generate(),
            filename: name.to_string(),
            storage_key: format!("{}/{}", directory.id, name),
            content_type: "text/plain".to_string(),
            size: 4,
            sha256: Some("0".repeat(64)),
            directory_id: directory.id.clone(),
            owner_id: owner.id.clone(),
            confirmed: true,
            is_public: false,
            created_at: self.clock_now().await,
        };
        self.blobs.put(file.storage_key.clone()).await;
        self.backend.files.create(file.clone()).await.expect("unique file");
        file
    }

    async fn insert_dir(
        &self,
        owner: &Principal,
        name: &str,
        parent: Option<&Directory>,
        is_public: bool,
    ) -> Directory {
        let directory = Directory {
            id: DirectoryId::generate(),
            name: name.to_string(),
            owner_id: owner.id.clone(),
            parent_id: parent.map(|p| p.id.clone()),
            path: match parent {
                Some(parent) => parent.child_path(name),
                None => Directory::root_path(name),
            },
            is_public,
            created_at: self.clock_now().await,
        };
        self.backend
            .directories
            .create(directory.clone())
            .await
            .expect("unique directory");
        directory
    }

    async fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now().await
    }
}

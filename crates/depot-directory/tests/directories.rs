//! Directory service: creation, reads and updates

use assert_matches::assert_matches;
use depot_core::effects::DirectoryStore;
use depot_core::{DepotError, NameConfig, DepotConfig, Permission, Role};
use depot_directory::{DirectoryPatch, NewDirectory};
use depot_testkit::TestWorld;

fn root(name: &str) -> NewDirectory {
    NewDirectory {
        name: name.to_string(),
        parent_id: None,
        is_public: false,
    }
}

fn child(name: &str, parent: &depot_core::Directory) -> NewDirectory {
    NewDirectory {
        name: name.to_string(),
        parent_id: Some(parent.id.clone()),
        is_public: false,
    }
}

#[tokio::test]
async fn create_computes_materialized_paths() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let service = &world.depot.directories;

    let docs = service.create(&me, root("docs")).await.unwrap();
    let taxes = service.create(&me, child("taxes", &docs)).await.unwrap();

    assert_eq!(docs.path, "/docs");
    assert_eq!(taxes.path, "/docs/taxes");
    assert_eq!(taxes.parent_id, Some(docs.id.clone()));
    assert_eq!(taxes.owner_id, me.id);
}

#[tokio::test]
async fn duplicate_path_for_same_owner_conflicts() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let other = world.add_user("other@depot.test", Role::User).await;
    let service = &world.depot.directories;

    service.create(&me, root("docs")).await.unwrap();
    assert_matches!(
        service.create(&me, root("docs")).await,
        Err(DepotError::Conflict { .. })
    );
    // Paths are unique per owner only.
    service.create(&other, root("docs")).await.unwrap();
}

#[tokio::test]
async fn invalid_names_and_missing_parent_are_validation_errors() {
    let config = DepotConfig {
        names: NameConfig { max_name_len: 8 },
        ..DepotConfig::default()
    };
    let world = TestWorld::with_config(config);
    let me = world.add_user("me@depot.test", Role::User).await;
    let service = &world.depot.directories;

    for name in ["", "a/b", "far-too-long"] {
        assert_matches!(
            service.create(&me, root(name)).await,
            Err(DepotError::Validation { .. }),
            "{name:?}"
        );
    }

    let orphan = NewDirectory {
        name: "x".to_string(),
        parent_id: Some("missing".into()),
        is_public: false,
    };
    assert_matches!(
        service.create(&me, orphan).await,
        Err(DepotError::Validation { .. })
    );
    assert!(world.backend.directories.is_empty().await);
}

#[tokio::test]
async fn public_parent_does_not_confer_subdirectory_creation() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let public = world.add_public_dir(&owner, "pub", None).await;
    let service = &world.depot.directories;

    assert_matches!(
        service.create(&guest, child("mine", &public)).await,
        Err(DepotError::PermissionDenied { .. })
    );

    world.grant(&guest, &public, [Permission::Write]).await;
    let created = service.create(&guest, child("mine", &public)).await.unwrap();
    assert_eq!(created.owner_id, guest.id);
    assert_eq!(created.path, "/pub/mine");
}

#[tokio::test]
async fn inherited_write_grant_allows_nested_creation() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let chain = world.add_chain(&owner, 2).await;
    world.grant(&guest, &chain[0], [Permission::Read, Permission::Write]).await;

    world
        .depot
        .directories
        .create(&guest, child("new", &chain[1]))
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_accounts_cannot_create() {
    let world = TestWorld::new();
    let pending = world.add_user("pending@depot.test", Role::Pending).await;
    assert_matches!(
        world.depot.directories.create(&pending, root("x")).await,
        Err(DepotError::PermissionDenied { .. })
    );
}

#[tokio::test]
async fn get_distinguishes_missing_from_denied() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let dir = world.add_dir(&owner, "d", None).await;
    let service = &world.depot.directories;

    assert_eq!(service.get(&owner, &dir.id).await.unwrap(), dir);
    assert_matches!(
        service.get(&guest, &dir.id).await,
        Err(DepotError::PermissionDenied { .. })
    );
    assert_matches!(
        service.get(&guest, &"missing".into()).await,
        Err(DepotError::NotFound { .. })
    );
}

#[tokio::test]
async fn rename_recomputes_own_path_only() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let chain = world.add_chain(&me, 3).await;
    let service = &world.depot.directories;

    let renamed = service
        .update(
            &me,
            &chain[1].id,
            DirectoryPatch {
                name: Some("middle".to_string()),
                is_public: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "middle");
    assert_eq!(renamed.path, "/root/middle");

    let grandchild = world.backend.directories.get(&chain[2].id).await.unwrap().unwrap();
    assert_eq!(grandchild.path, "/root/level1/level2");
}

#[tokio::test]
async fn rename_onto_sibling_conflicts() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let a = world.add_dir(&me, "a", None).await;
    world.add_dir(&me, "b", None).await;

    let patch = DirectoryPatch {
        name: Some("b".to_string()),
        is_public: None,
    };
    assert_matches!(
        world.depot.directories.update(&me, &a.id, patch).await,
        Err(DepotError::Conflict { .. })
    );
}

#[tokio::test]
async fn only_owner_or_super_admin_updates() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let root = world.add_user("root@depot.test", Role::SuperAdmin).await;
    let dir = world.add_dir(&owner, "d", None).await;
    world.grant(&admin, &dir, [Permission::Write]).await;

    let publish = DirectoryPatch {
        name: None,
        is_public: Some(true),
    };
    assert_matches!(
        world.depot.directories.update(&admin, &dir.id, publish.clone()).await,
        Err(DepotError::PermissionDenied { .. })
    );
    let updated = world
        .depot
        .directories
        .update(&root, &dir.id, publish)
        .await
        .unwrap();
    assert!(updated.is_public);
}

#[tokio::test]
async fn empty_patch_is_a_no_op() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;

    let same = world
        .depot
        .directories
        .update(&me, &dir.id, DirectoryPatch::default())
        .await
        .unwrap();
    assert_eq!(same, dir);
}

#[tokio::test]
async fn list_returns_visible_directories() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let other = world.add_user("other@depot.test", Role::User).await;
    let mine = world.add_dir(&me, "mine", None).await;
    world.add_dir(&other, "hidden", None).await;

    let listed = world.depot.directories.list(&me).await.unwrap();
    assert_eq!(listed, vec![mine]);
}

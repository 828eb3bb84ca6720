//! Cascade planning, execution and the directory delete entry point

use assert_matches::assert_matches;
use depot_core::effects::{BlobStore, DirectoryStore, FileStore, GrantStore};
use depot_core::{AuthorizationConfig, DepotConfig, DepotError, Permission, Role};
use depot_directory::CascadeReport;
use depot_testkit::TestWorld;
use std::collections::BTreeSet;

#[tokio::test]
async fn cascade_removes_whole_chain_with_files_and_grants() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let unrelated = world.add_dir(&owner, "keep", None).await;
    let kept_file = world.add_file(&owner, &unrelated, "keep.txt").await;
    world.grant(&guest, &unrelated, [Permission::Read]).await;

    let chain = world.add_chain(&owner, 3).await;
    for (i, dir) in chain.iter().enumerate() {
        world.add_file(&owner, dir, &format!("f{i}.txt")).await;
        world.grant(&guest, dir, [Permission::Read]).await;
    }
    let ids: BTreeSet<_> = chain.iter().map(|d| d.id.clone()).collect();

    let plan = world.depot.planner.plan(&chain[0].id).await.unwrap();
    assert_eq!(plan.as_set(), ids);
    assert_eq!(plan.directories[0], chain[0].id);

    let report = world.depot.executor.execute(&plan).await.unwrap();
    assert_eq!(
        report,
        CascadeReport {
            files: 3,
            grants: 3,
            directories: 3,
        }
    );

    for id in &ids {
        assert!(world.backend.directories.get(id).await.unwrap().is_none());
        assert!(world.backend.files.list_by_directory(id).await.unwrap().is_empty());
        assert!(world.backend.grants.list_by_directory(id).await.unwrap().is_empty());
    }
    assert!(world.backend.directories.get(&unrelated.id).await.unwrap().is_some());
    assert!(world.backend.files.get(&kept_file.id).await.unwrap().is_some());
    assert_eq!(world.backend.grants.len().await, 1);
}

#[tokio::test]
async fn cascade_leaves_blobs_in_place() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let dir = world.add_dir(&owner, "d", None).await;
    let file = world.add_file(&owner, &dir, "a.txt").await;

    world
        .depot
        .directories
        .delete(&owner, &dir.id, true)
        .await
        .unwrap();
    assert!(world.blobs.exists(&file.storage_key).await.unwrap());
}

#[tokio::test]
async fn delete_without_cascade_refuses_children_and_files() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let chain = world.add_chain(&owner, 2).await;
    let service = &world.depot.directories;

    assert_matches!(
        service.delete(&owner, &chain[0].id, false).await,
        Err(DepotError::Conflict { .. })
    );

    world.add_file(&owner, &chain[1], "f.txt").await;
    assert_matches!(
        service.delete(&owner, &chain[1].id, false).await,
        Err(DepotError::Conflict { .. })
    );
    assert_eq!(world.backend.directories.len().await, 2);
}

#[tokio::test]
async fn delete_empty_directory_drops_its_grants() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let dir = world.add_dir(&owner, "d", None).await;
    world.grant(&guest, &dir, [Permission::Read]).await;

    let report = world
        .depot
        .directories
        .delete(&owner, &dir.id, false)
        .await
        .unwrap();
    assert_eq!(report.grants, 1);
    assert_eq!(report.directories, 1);
    assert!(world.backend.grants.is_empty().await);
}

#[tokio::test]
async fn only_owner_or_super_admin_deletes() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let root = world.add_user("root@depot.test", Role::SuperAdmin).await;
    let dir = world.add_dir(&owner, "d", None).await;
    // A delete grant does not make a non-owner able to remove the directory.
    world.grant(&admin, &dir, [Permission::Delete]).await;

    assert_matches!(
        world.depot.directories.delete(&admin, &dir.id, true).await,
        Err(DepotError::PermissionDenied { .. })
    );
    world
        .depot
        .directories
        .delete(&root, &dir.id, true)
        .await
        .unwrap();
    assert!(world.backend.directories.is_empty().await);
}

#[tokio::test]
async fn cascade_of_missing_directory_is_not_found() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    assert_matches!(
        world
            .depot
            .directories
            .delete(&owner, &"missing".into(), true)
            .await,
        Err(DepotError::NotFound { .. })
    );
}

fn capped_world(max_traversal_depth: usize) -> TestWorld {
    TestWorld::with_config(DepotConfig {
        authorization: AuthorizationConfig {
            max_traversal_depth,
        },
        ..DepotConfig::default()
    })
}

#[tokio::test]
async fn planner_and_resolver_share_one_depth_cap() {
    // Three directories are two levels deep in either direction.
    for (cap, accepted) in [(1, false), (2, true), (3, true)] {
        let world = capped_world(cap);
        let owner = world.add_user("owner@depot.test", Role::User).await;
        let guest = world.add_user("guest@depot.test", Role::User).await;
        let chain = world.add_chain(&owner, 3).await;
        world.grant(&guest, &chain[0], [Permission::Read]).await;

        let planned = world.depot.planner.plan(&chain[0].id).await;
        let checked = world
            .resolver()
            .can_access(&guest, &chain[2].id, Permission::Read)
            .await;

        if accepted {
            assert_eq!(planned.unwrap().len(), 3, "cap {cap}");
            assert!(checked.unwrap(), "cap {cap}");
        } else {
            assert_matches!(planned, Err(DepotError::DepthExceeded { limit: 1 }));
            assert_matches!(checked, Err(DepotError::DepthExceeded { limit: 1 }));
        }
    }
}

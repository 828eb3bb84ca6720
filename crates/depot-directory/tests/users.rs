//! User administration

use assert_matches::assert_matches;
use depot_core::{DepotError, Role};
use depot_directory::UserPatch;
use depot_testkit::TestWorld;

#[tokio::test]
async fn manage_users_capability_is_required() {
    let world = TestWorld::new();
    let user = world.add_user("user@depot.test", Role::User).await;
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let users = &world.depot.users;

    assert_matches!(
        users.list(&user, 0, 10).await,
        Err(DepotError::PermissionDenied { .. })
    );
    assert_eq!(users.list(&admin, 0, 10).await.unwrap().len(), 2);
    assert_eq!(users.list(&admin, 1, 10).await.unwrap().len(), 1);
    assert_eq!(users.get(&admin, &user.id).await.unwrap().email, "user@depot.test");
}

#[tokio::test]
async fn page_size_is_bounded() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    for limit in [0, 101] {
        assert_matches!(
            world.depot.users.list(&admin, 0, limit).await,
            Err(DepotError::Validation { .. })
        );
    }
}

#[tokio::test]
async fn admin_approves_pending_account() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let pending = world.add_user("pending@depot.test", Role::Pending).await;

    let approved = world
        .depot
        .users
        .update(
            &admin,
            &pending.id,
            UserPatch {
                role: Some(Role::User),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(approved.role, Role::User);
}

#[tokio::test]
async fn escalation_rules() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let root = world.add_user("root@depot.test", Role::SuperAdmin).await;
    let user = world.add_user("user@depot.test", Role::User).await;
    let users = &world.depot.users;

    let promote = UserPatch {
        role: Some(Role::SuperAdmin),
        ..UserPatch::default()
    };
    assert_matches!(
        users.update(&admin, &user.id, promote.clone()).await,
        Err(DepotError::PermissionDenied { .. })
    );
    assert_matches!(
        users
            .update(
                &admin,
                &root.id,
                UserPatch {
                    is_active: Some(false),
                    ..UserPatch::default()
                }
            )
            .await,
        Err(DepotError::PermissionDenied { .. })
    );
    assert_eq!(
        users.update(&root, &user.id, promote).await.unwrap().role,
        Role::SuperAdmin
    );
}

#[tokio::test]
async fn email_changes_are_super_admin_only() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let root = world.add_user("root@depot.test", Role::SuperAdmin).await;
    let user = world.add_user("user@depot.test", Role::User).await;
    let users = &world.depot.users;
    let email = |e: &str| UserPatch {
        email: Some(e.to_string()),
        ..UserPatch::default()
    };

    assert_matches!(
        users.update(&admin, &user.id, email("new@depot.test")).await,
        Err(DepotError::PermissionDenied { .. })
    );
    assert_matches!(
        users.update(&root, &user.id, email("not-an-email")).await,
        Err(DepotError::Validation { .. })
    );
    assert_matches!(
        users.update(&root, &user.id, email("admin@depot.test")).await,
        Err(DepotError::Conflict { .. })
    );
    assert_eq!(
        users
            .update(&root, &user.id, email("new@depot.test"))
            .await
            .unwrap()
            .email,
        "new@depot.test"
    );
}

#[tokio::test]
async fn cannot_deactivate_or_delete_self() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let users = &world.depot.users;

    assert_matches!(
        users
            .update(
                &admin,
                &admin.id,
                UserPatch {
                    is_active: Some(false),
                    ..UserPatch::default()
                }
            )
            .await,
        Err(DepotError::Validation { .. })
    );
    assert_matches!(
        users.delete(&admin, &admin.id).await,
        Err(DepotError::Validation { .. })
    );
}

#[tokio::test]
async fn delete_removes_account() {
    let world = TestWorld::new();
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let user = world.add_user("user@depot.test", Role::User).await;
    let users = &world.depot.users;

    users.delete(&admin, &user.id).await.unwrap();
    assert_matches!(
        users.get(&admin, &user.id).await,
        Err(DepotError::NotFound { .. })
    );
    assert_matches!(
        users.delete(&admin, &user.id).await,
        Err(DepotError::NotFound { .. })
    );
}

//! File service: upload handshake, downloads and deletion

use assert_matches::assert_matches;
use depot_core::effects::{BlobStore, FileStore};
use depot_core::{DepotError, Directory, Permission, Role};
use depot_directory::UploadRequest;
use depot_testkit::TestWorld;

const HASH: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

fn upload(directory: &Directory, filename: &str) -> UploadRequest {
    UploadRequest {
        filename: filename.to_string(),
        content_type: "application/pdf".to_string(),
        size: 1024,
        directory_id: directory.id.clone(),
    }
}

#[tokio::test]
async fn upload_request_then_confirm() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;
    let files = &world.depot.files;

    let ticket = files.request_upload(&me, upload(&dir, "report.pdf")).await.unwrap();
    assert_eq!(ticket.expires_in_secs, 3600);
    assert!(ticket.presigned_url.contains("method=PUT"));

    let pending = world.backend.files.get(&ticket.file_id).await.unwrap().unwrap();
    assert!(!pending.confirmed);
    let prefix = format!("{}/", dir.id);
    let suffix = pending.storage_key.strip_prefix(&prefix).unwrap();
    let (nonce, name) = suffix.split_once('_').unwrap();
    assert_eq!(nonce.len(), 8);
    assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(name, "report.pdf");

    // Unconfirmed files are not listed.
    assert!(files.list(&me, &dir.id).await.unwrap().is_empty());

    world.blobs.put(pending.storage_key.clone()).await;
    let confirmed = files
        .confirm_upload(&me, &ticket.file_id, &HASH.to_uppercase())
        .await
        .unwrap();
    assert!(confirmed.confirmed);
    assert_eq!(confirmed.sha256.as_deref(), Some(HASH));
    assert_eq!(files.list(&me, &dir.id).await.unwrap(), vec![confirmed]);

    assert_matches!(
        files.confirm_upload(&me, &ticket.file_id, HASH).await,
        Err(DepotError::Conflict { .. })
    );
}

#[tokio::test]
async fn upload_limits_are_enforced() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;
    let files = &world.depot.files;

    let mut exe = upload(&dir, "tool.exe");
    exe.content_type = "application/x-msdownload".to_string();
    let mut empty = upload(&dir, "empty.pdf");
    empty.size = 0;
    let mut huge = upload(&dir, "huge.pdf");
    huge.size = 100 * 1024 * 1024 + 1;

    for request in [exe, empty, huge, upload(&dir, "a/b.pdf")] {
        assert_matches!(
            files.request_upload(&me, request).await,
            Err(DepotError::Validation { .. })
        );
    }
    assert!(world.backend.files.is_empty().await);
}

#[tokio::test]
async fn upload_needs_write_on_directory() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let private = world.add_dir(&owner, "private", None).await;
    let public = world.add_public_dir(&owner, "public", None).await;
    let files = &world.depot.files;

    assert_matches!(
        files.request_upload(&guest, upload(&private, "x.pdf")).await,
        Err(DepotError::PermissionDenied { .. })
    );
    files.request_upload(&guest, upload(&public, "x.pdf")).await.unwrap();

    let mut missing = upload(&private, "x.pdf");
    missing.directory_id = "missing".into();
    assert_matches!(
        files.request_upload(&guest, missing).await,
        Err(DepotError::NotFound { .. })
    );
}

#[tokio::test]
async fn confirm_without_blob_discards_record() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;
    let files = &world.depot.files;
    let ticket = files.request_upload(&me, upload(&dir, "a.pdf")).await.unwrap();

    assert_matches!(
        files.confirm_upload(&me, &ticket.file_id, HASH).await,
        Err(DepotError::Validation { .. })
    );
    assert!(world.backend.files.get(&ticket.file_id).await.unwrap().is_none());
}

#[tokio::test]
async fn confirm_checks_uploader_and_hash() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let other = world.add_user("other@depot.test", Role::Admin).await;
    let dir = world.add_public_dir(&me, "d", None).await;
    let files = &world.depot.files;
    let ticket = files.request_upload(&me, upload(&dir, "a.pdf")).await.unwrap();

    assert_matches!(
        files.confirm_upload(&other, &ticket.file_id, HASH).await,
        Err(DepotError::PermissionDenied { .. })
    );
    let not_hex = "z".repeat(64);
    for bad in ["abc", not_hex.as_str()] {
        assert_matches!(
            files.confirm_upload(&me, &ticket.file_id, bad).await,
            Err(DepotError::Validation { .. })
        );
    }
}

#[tokio::test]
async fn reconfirm_is_a_conflict_whatever_the_hash() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;
    let file = world.add_file(&me, &dir, "done.txt").await;
    let files = &world.depot.files;

    for hash in [HASH, "not-a-hash"] {
        assert_matches!(
            files.confirm_upload(&me, &file.id, hash).await,
            Err(DepotError::Conflict { .. })
        );
    }
}

#[tokio::test]
async fn downloads_follow_directory_read_access() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let chain = world.add_chain(&owner, 2).await;
    let file = world.add_file(&owner, &chain[1], "notes.txt").await;
    let files = &world.depot.files;

    assert_matches!(
        files.download_url(&guest, &file.id).await,
        Err(DepotError::PermissionDenied { .. })
    );

    world.grant(&guest, &chain[0], [Permission::Read]).await;
    let ticket = files.download_url(&guest, &file.id).await.unwrap();
    assert!(ticket.url.contains("disposition=attachment"));
    assert_eq!(ticket.filename, "notes.txt");

    let preview = files.preview_url(&guest, &file.id).await.unwrap();
    assert!(preview.url.contains("disposition=inline"));
}

#[tokio::test]
async fn unconfirmed_file_has_no_download() {
    let world = TestWorld::new();
    let me = world.add_user("me@depot.test", Role::User).await;
    let dir = world.add_dir(&me, "d", None).await;
    let ticket = world
        .depot
        .files
        .request_upload(&me, upload(&dir, "a.pdf"))
        .await
        .unwrap();

    assert_matches!(
        world.depot.files.download_url(&me, &ticket.file_id).await,
        Err(DepotError::NotFound { .. })
    );
}

#[tokio::test]
async fn public_link_requires_public_confirmed_file() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let guest = world.add_user("guest@depot.test", Role::User).await;
    let dir = world.add_dir(&owner, "d", None).await;
    let file = world.add_file(&owner, &dir, "pic.png").await;
    let files = &world.depot.files;

    assert_matches!(
        files.public_file_url(&file.id).await,
        Err(DepotError::NotFound { .. })
    );
    assert_matches!(
        files.set_public(&guest, &file.id, true).await,
        Err(DepotError::PermissionDenied { .. })
    );

    let shared = files.set_public(&owner, &file.id, true).await.unwrap();
    assert!(shared.is_public);
    let ticket = files.public_file_url(&file.id).await.unwrap();
    assert!(ticket.url.contains("disposition=inline"));
}

#[tokio::test]
async fn delete_needs_delete_permission_and_removes_blob() {
    let world = TestWorld::new();
    let owner = world.add_user("owner@depot.test", Role::User).await;
    let user = world.add_user("user@depot.test", Role::User).await;
    let admin = world.add_user("admin@depot.test", Role::Admin).await;
    let dir = world.add_dir(&owner, "d", None).await;
    let file = world.add_file(&owner, &dir, "a.txt").await;
    world.grant(&user, &dir, [Permission::Delete]).await;
    world.grant(&admin, &dir, [Permission::Delete]).await;
    let files = &world.depot.files;

    // The user role never carries delete, whatever the grant says.
    assert_matches!(
        files.delete(&user, &file.id).await,
        Err(DepotError::PermissionDenied { .. })
    );

    files.delete(&admin, &file.id).await.unwrap();
    assert!(world.backend.files.get(&file.id).await.unwrap().is_none());
    assert!(!world.blobs.exists(&file.storage_key).await.unwrap());
}

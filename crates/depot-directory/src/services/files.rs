//! File metadata and presigned transfer URLs
//!
//! A file inherits its directory's effective permissions. Upload is two
//! steps: request a presigned PUT URL, then confirm with the content hash
//! once the bytes are in the blob store.

use super::validate_name;
use crate::depot::DepotHandles;
use depot_authorization::{AuthorizationResolver, Principal};
use depot_core::effects::{
    BlobStore, DirectoryStore, Disposition, FileStore, PhysicalTimeEffects,
};
use depot_core::{
    DepotError, DepotConfig, DirectoryId, FileId, FileRecord, FileUpdate, Permission, Result,
    UploadConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Input for [`FileService::request_upload`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Client-side file name
    pub filename: String,
    /// MIME type, checked against the allow-list
    pub content_type: String,
    /// Declared size in bytes
    pub size: u64,
    /// Destination directory
    pub directory_id: DirectoryId,
}

/// Where to PUT the bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    /// Record created for the pending upload
    pub file_id: FileId,
    /// Presigned PUT URL
    pub presigned_url: String,
    /// URL lifetime
    pub expires_in_secs: u64,
}

/// Where to GET the bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTicket {
    /// File being fetched
    pub file_id: FileId,
    /// Name offered to the browser
    pub filename: String,
    /// Presigned GET URL
    pub url: String,
    /// URL lifetime
    pub expires_in_secs: u64,
}

/// File operations with the directory's authorization applied
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileStore>,
    directories: Arc<dyn DirectoryStore>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn PhysicalTimeEffects>,
    resolver: AuthorizationResolver,
    uploads: UploadConfig,
    max_name_len: usize,
}

impl FileService {
    pub(crate) fn new(
        handles: &DepotHandles,
        resolver: AuthorizationResolver,
        config: &DepotConfig,
    ) -> Self {
        Self {
            files: handles.files.clone(),
            directories: handles.directories.clone(),
            blobs: handles.blobs.clone(),
            clock: handles.clock.clone(),
            resolver,
            uploads: config.uploads.clone(),
            max_name_len: config.names.max_name_len,
        }
    }

    /// Reserve an unconfirmed record and presign the upload
    pub async fn request_upload(
        &self,
        principal: &Principal,
        request: UploadRequest,
    ) -> Result<UploadTicket> {
        validate_name("file", &request.filename, self.max_name_len)?;
        if !self.uploads.accepts_mime(&request.content_type) {
            return Err(DepotError::validation(format!(
                "content type {} is not allowed",
                request.content_type
            )));
        }
        if request.size == 0 {
            return Err(DepotError::validation("file is empty"));
        }
        if request.size > self.uploads.max_file_size_bytes() {
            return Err(DepotError::validation(format!(
                "file exceeds the {} MB limit",
                self.uploads.max_file_size_mb
            )));
        }

        self.resolver
            .authorize(principal, &request.directory_id, Permission::Write)
            .await?;

        let nonce = Uuid::new_v4().simple().to_string();
        let storage_key = format!(
            "{}/{}_{}",
            request.directory_id,
            &nonce[..8],
            request.filename
        );
        let presigned_url = self
            .blobs
            .presign_upload(&storage_key, &request.content_type, self.expiry())
            .await?;

        let record = FileRecord {
            id: FileId::generate(),
            filename: request.filename,
            storage_key,
            content_type: request.content_type,
            size: request.size,
            sha256: None,
            directory_id: request.directory_id,
            owner_id: principal.id.clone(),
            confirmed: false,
            is_public: false,
            created_at: self.clock.now().await,
        };
        self.files.create(record.clone()).await?;
        tracing::info!(
            file = %record.id,
            directory = %record.directory_id,
            size = record.size,
            "upload requested"
        );

        Ok(UploadTicket {
            file_id: record.id,
            presigned_url,
            expires_in_secs: self.uploads.presign_expiry_secs,
        })
    }

    /// Mark an upload complete once its bytes exist in the blob store.
    ///
    /// A record whose blob never arrived is deleted.
    pub async fn confirm_upload(
        &self,
        principal: &Principal,
        file_id: &FileId,
        sha256: &str,
    ) -> Result<FileRecord> {
        let file = self.load(file_id).await?;
        if file.owner_id != principal.id {
            return Err(DepotError::permission_denied(format!(
                "only the uploader may confirm file {file_id}"
            )));
        }
        if file.confirmed {
            return Err(DepotError::conflict(format!(
                "file {file_id} is already confirmed"
            )));
        }
        if sha256.len() != 64 || hex::decode(sha256).is_err() {
            return Err(DepotError::validation(
                "sha256 must be 64 hexadecimal characters",
            ));
        }

        if !self.blobs.exists(&file.storage_key).await? {
            self.files.delete_one(file_id).await?;
            tracing::warn!(file = %file_id, key = %file.storage_key, "confirmed upload missing from blob store");
            return Err(DepotError::validation(format!(
                "no uploaded content for file {file_id}"
            )));
        }

        let update = FileUpdate {
            sha256: Some(sha256.to_ascii_lowercase()),
            confirmed: Some(true),
            ..FileUpdate::default()
        };
        let confirmed = self
            .files
            .update_fields(file_id, update)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("file {file_id}")))?;
        tracing::info!(file = %file_id, "upload confirmed");
        Ok(confirmed)
    }

    /// Presigned download as an attachment
    pub async fn download_url(
        &self,
        principal: &Principal,
        file_id: &FileId,
    ) -> Result<DownloadTicket> {
        self.readable_ticket(principal, file_id, Disposition::Attachment)
            .await
    }

    /// Presigned download rendered inline
    pub async fn preview_url(
        &self,
        principal: &Principal,
        file_id: &FileId,
    ) -> Result<DownloadTicket> {
        self.readable_ticket(principal, file_id, Disposition::Inline)
            .await
    }

    /// Confirmed files in a readable directory
    pub async fn list(
        &self,
        principal: &Principal,
        directory_id: &DirectoryId,
    ) -> Result<Vec<FileRecord>> {
        self.resolver
            .authorize(principal, directory_id, Permission::Read)
            .await?;
        let mut files = self.files.list_by_directory(directory_id).await?;
        files.retain(|file| file.confirmed);
        Ok(files)
    }

    /// Toggle public link access; directory owner or super-admin
    pub async fn set_public(
        &self,
        principal: &Principal,
        file_id: &FileId,
        is_public: bool,
    ) -> Result<FileRecord> {
        let file = self.load(file_id).await?;
        let directory = self
            .directories
            .get(&file.directory_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("directory {}", file.directory_id)))?;
        if !directory.is_owned_by(&principal.id) && !principal.is_super_admin() {
            return Err(DepotError::permission_denied(format!(
                "only the directory owner may share file {file_id}"
            )));
        }

        let update = FileUpdate {
            is_public: Some(is_public),
            ..FileUpdate::default()
        };
        self.files
            .update_fields(file_id, update)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("file {file_id}")))
    }

    /// Remove the blob, then the record
    pub async fn delete(&self, principal: &Principal, file_id: &FileId) -> Result<()> {
        let file = self.load(file_id).await?;
        self.resolver
            .authorize(principal, &file.directory_id, Permission::Delete)
            .await?;
        self.blobs.delete(&file.storage_key).await?;
        self.files.delete_one(file_id).await?;
        tracing::info!(file = %file_id, directory = %file.directory_id, "file deleted");
        Ok(())
    }

    /// Inline URL for a confirmed public file, no principal required
    pub async fn public_file_url(&self, file_id: &FileId) -> Result<DownloadTicket> {
        let file = self
            .files
            .get(file_id)
            .await?
            .filter(|file| file.confirmed && file.is_public)
            .ok_or_else(|| DepotError::not_found(format!("file {file_id}")))?;
        self.ticket(file, Disposition::Inline).await
    }

    async fn readable_ticket(
        &self,
        principal: &Principal,
        file_id: &FileId,
        disposition: Disposition,
    ) -> Result<DownloadTicket> {
        let file = self.load(file_id).await?;
        if !file.confirmed {
            return Err(DepotError::not_found(format!("file {file_id}")));
        }
        self.resolver
            .authorize(principal, &file.directory_id, Permission::Read)
            .await?;
        self.ticket(file, disposition).await
    }

    async fn ticket(&self, file: FileRecord, disposition: Disposition) -> Result<DownloadTicket> {
        let url = self
            .blobs
            .presign_download(&file.storage_key, &file.filename, disposition, self.expiry())
            .await?;
        Ok(DownloadTicket {
            file_id: file.id,
            filename: file.filename,
            url,
            expires_in_secs: self.uploads.presign_expiry_secs,
        })
    }

    async fn load(&self, file_id: &FileId) -> Result<FileRecord> {
        self.files
            .get(file_id)
            .await?
            .ok_or_else(|| DepotError::not_found(format!("file {file_id}")))
    }

    fn expiry(&self) -> Duration {
        Duration::from_secs(self.uploads.presign_expiry_secs)
    }
}

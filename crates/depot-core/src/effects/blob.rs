//! Blob store contract.
//!
//! Bytes never pass through the core: clients upload and download via
//! presigned URLs, and the core only checks existence and deletes.

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a download URL asks the browser to treat the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Save as a file
    Attachment,
    /// Render in place
    Inline,
}

impl Disposition {
    /// Header value fragment.
    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

/// Object storage for file bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// URL the client PUTs the bytes to.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String>;

    /// URL the client GETs the bytes from.
    async fn presign_download(
        &self,
        key: &str,
        filename_hint: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> Result<String>;

    /// Whether an object exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove the object; `true` if it existed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

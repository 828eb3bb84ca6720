//! Runtime configuration.
//!
//! Loaded from a TOML file, then overridden by `DEPOT_<SECTION>_<KEY>`
//! environment variables, then validated. Every field has a default so an
//! empty file is a valid configuration.

use crate::errors::{DepotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "DEPOT_";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DepotConfig {
    /// Resolver and traversal limits
    pub authorization: AuthorizationConfig,
    /// Upload validation and presigning
    pub uploads: UploadConfig,
    /// Directory and file name rules
    pub names: NameConfig,
}

/// Resolver limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Maximum parent links followed above, or child levels below, the starting directory
    pub max_traversal_depth: usize,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: 256,
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Largest accepted declared size
    pub max_file_size_mb: u64,
    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
    /// Lifetime of presigned URLs
    pub presign_expiry_secs: u64,
}

impl UploadConfig {
    /// Size limit in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whether `content_type` is on the allow-list.
    pub fn accepts_mime(&self, content_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == content_type)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            allowed_mime_types: [
                "image/jpeg",
                "image/png",
                "image/gif",
                "application/pdf",
                "text/plain",
                "application/zip",
                "video/mp4",
                "video/webm",
                "video/ogg",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            presign_expiry_secs: 3600,
        }
    }
}

/// Naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameConfig {
    /// Longest accepted directory or file name, in characters
    pub max_name_len: usize,
}

impl Default for NameConfig {
    fn default() -> Self {
        Self { max_name_len: 255 }
    }
}

impl DepotConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| DepotError::validation(format!("Invalid config: {e}")))
    }

    /// Load, apply environment overrides and validate.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DepotError::validation(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DEPOT_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `DEPOT_*` overrides from an explicit variable list.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "AUTHORIZATION_MAX_TRAVERSAL_DEPTH" => {
                    self.authorization.max_traversal_depth = parse_number(&key, &value)?;
                }
                "UPLOADS_MAX_FILE_SIZE_MB" => {
                    self.uploads.max_file_size_mb = parse_number(&key, &value)?;
                }
                "UPLOADS_ALLOWED_MIME_TYPES" => {
                    self.uploads.allowed_mime_types = value
                        .split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(String::from)
                        .collect();
                }
                "UPLOADS_PRESIGN_EXPIRY_SECS" => {
                    self.uploads.presign_expiry_secs = parse_number(&key, &value)?;
                }
                "NAMES_MAX_NAME_LEN" => {
                    self.names.max_name_len = parse_number(&key, &value)?;
                }
                _ => tracing::debug!(key = %key, "ignoring unrecognised DEPOT_ variable"),
            }
        }
        Ok(())
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.authorization.max_traversal_depth == 0 {
            return Err(DepotError::validation(
                "authorization.max_traversal_depth must be at least 1",
            ));
        }
        if self.uploads.max_file_size_mb == 0 {
            return Err(DepotError::validation(
                "uploads.max_file_size_mb must be at least 1",
            ));
        }
        if self.uploads.allowed_mime_types.is_empty() {
            return Err(DepotError::validation(
                "uploads.allowed_mime_types must not be empty",
            ));
        }
        if self.uploads.presign_expiry_secs == 0 {
            return Err(DepotError::validation(
                "uploads.presign_expiry_secs must be at least 1",
            ));
        }
        if self.names.max_name_len == 0 {
            return Err(DepotError::validation("names.max_name_len must be at least 1"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DepotError::validation(format!("{key} expects a number, got {value:?}")))
}

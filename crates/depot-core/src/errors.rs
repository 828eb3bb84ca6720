//! Unified error system for Depot
//!
//! One error type is shared by effect handlers, the authorization resolver
//! and the application services. Variants follow the failure taxonomy callers
//! branch on: missing targets, denied access, uniqueness collisions and
//! malformed input are all terminal and never retried.

use serde::{Deserialize, Serialize};

/// Unified error type for all Depot operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DepotError {
    /// Target directory, file, grant or user is absent
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Role ceiling, ownership mismatch or grant denial
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Why access was refused
        message: String,
    },

    /// Uniqueness constraint violated (duplicate path, email, storage key)
    #[error("Conflict: {message}")]
    Conflict {
        /// Which constraint collided
        message: String,
    },

    /// Malformed input or undecodable persisted record
    #[error("Validation failed: {message}")]
    Validation {
        /// What was malformed
        message: String,
    },

    /// Ancestor or descendant walk went deeper than the configured cap
    #[error("Traversal exceeded depth limit of {limit}")]
    DepthExceeded {
        /// Configured cap
        limit: usize,
    },

    /// Credentials or token rejected by the credential service
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Why the credential was rejected
        message: String,
    },

    /// Store or blob handler failure
    #[error("Storage error: {message}")]
    Storage {
        /// Handler failure description
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl DepotError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a depth exceeded error
    pub fn depth_exceeded(limit: usize) -> Self {
        Self::DepthExceeded { limit }
    }

    /// Create an unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error means the target does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is an access refusal
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Standard Result type for Depot operations
pub type Result<T> = std::result::Result<T, DepotError>;

impl From<serde_json::Error> for DepotError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<std::io::Error> for DepotError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DepotError::conflict("duplicate path /docs");
        assert!(matches!(err, DepotError::Conflict { .. }));
        assert_eq!(err.to_string(), "Conflict: duplicate path /docs");
    }

    #[test]
    fn test_depth_error_message() {
        assert_eq!(
            DepotError::depth_exceeded(8).to_string(),
            "Traversal exceeded depth limit of 8"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "state.json");
        let err = DepotError::from(io_err);
        assert!(err.is_not_found());
    }
}

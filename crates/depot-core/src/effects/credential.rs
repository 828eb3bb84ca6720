//! Credential service contract.
//!
//! Password hashing and token minting live behind this trait. The core
//! trusts the subject and role it returns for the duration of one call.

use crate::errors::Result;
use crate::identifiers::UserId;
use crate::role::Role;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Plain password, never persisted by the core
    pub password: String,
}

/// Successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticated {
    /// Authenticated account
    pub subject: UserId,
    /// Role at the time of authentication
    pub role: Role,
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
}

/// Purpose of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Authorizes API calls
    Access,
    /// Only exchanges for a new pair
    Refresh,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account the token was issued to
    pub subject: UserId,
    /// Purpose
    pub token_type: TokenType,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}

/// Opaque credential service.
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Record login credentials for a new account.
    ///
    /// An email that already has credentials is `DepotError::Conflict`.
    async fn register(
        &self,
        subject: &UserId,
        role: Role,
        credentials: &Credentials,
    ) -> Result<()>;

    /// Forget the credentials for `email`; `true` if any were recorded.
    async fn unregister(&self, email: &str) -> Result<bool>;

    /// Verify credentials; rejection is `DepotError::Unauthenticated`.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated>;

    /// Decode a token; invalid tokens are `DepotError::Unauthenticated`.
    async fn decode(&self, token: &str) -> Result<TokenClaims>;
}

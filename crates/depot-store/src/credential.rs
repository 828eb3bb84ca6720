//! Token-table credential service
//!
//! Accounts are registered with a plain password and tokens are random
//! strings mapped to their claims. Not for production use: nothing is
//! hashed or signed.

use async_trait::async_trait;
use chrono::Duration;
use depot_core::effects::{
    Authenticated, CredentialService, Credentials, PhysicalTimeEffects, TokenClaims, TokenType,
};
use depot_core::{DepotError, Result, Role, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Account {
    subject: UserId,
    password: String,
    role: Role,
}

/// In-memory credential service
#[derive(Clone)]
pub struct MemoryCredentialService {
    clock: Arc<dyn PhysicalTimeEffects>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    tokens: Arc<RwLock<HashMap<String, TokenClaims>>>,
}

impl MemoryCredentialService {
    /// Create a service with 30 minute access and 7 day refresh lifetimes
    pub fn new(clock: Arc<dyn PhysicalTimeEffects>) -> Self {
        Self {
            clock,
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
            accounts: Arc::new(RwLock::new(HashMap::new())),
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mint a token with explicit claims
    pub async fn issue(&self, claims: TokenClaims) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.write().await.insert(token.clone(), claims);
        token
    }

    /// Forget a token
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

#[async_trait]
impl CredentialService for MemoryCredentialService {
    async fn register(
        &self,
        subject: &UserId,
        role: Role,
        credentials: &Credentials,
    ) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&credentials.email) {
            return Err(DepotError::conflict(format!(
                "credentials for {} already exist",
                credentials.email
            )));
        }
        accounts.insert(
            credentials.email.clone(),
            Account {
                subject: subject.clone(),
                password: credentials.password.clone(),
                role,
            },
        );
        Ok(())
    }

    async fn unregister(&self, email: &str) -> Result<bool> {
        Ok(self.accounts.write().await.remove(email).is_some())
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated> {
        let account = self
            .accounts
            .read()
            .await
            .get(&credentials.email)
            .cloned()
            .ok_or_else(|| DepotError::unauthenticated("invalid email or password"))?;
        if account.password != credentials.password {
            return Err(DepotError::unauthenticated("invalid email or password"));
        }

        let now = self.clock.now().await;
        let access_token = self
            .issue(TokenClaims {
                subject: account.subject.clone(),
                token_type: TokenType::Access,
                expires_at: now + self.access_ttl,
            })
            .await;
        let refresh_token = self
            .issue(TokenClaims {
                subject: account.subject.clone(),
                token_type: TokenType::Refresh,
                expires_at: now + self.refresh_ttl,
            })
            .await;

        Ok(Authenticated {
            subject: account.subject,
            role: account.role,
            access_token,
            refresh_token,
        })
    }

    async fn decode(&self, token: &str) -> Result<TokenClaims> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| DepotError::unauthenticated("invalid token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn service() -> MemoryCredentialService {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        MemoryCredentialService::new(Arc::new(FixedClock::new(epoch)))
    }

    fn login(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn second_registration_for_an_email_conflicts() {
        let creds = service();
        creds.register(&"u1".into(), Role::Pending, &login("a@example.com")).await.unwrap();
        assert_matches!(
            creds.register(&"u2".into(), Role::User, &login("a@example.com")).await,
            Err(DepotError::Conflict { .. })
        );
        let auth = creds.authenticate(&login("a@example.com")).await.unwrap();
        assert_eq!(auth.subject, UserId::from("u1"));
    }

    #[tokio::test]
    async fn unregistered_login_is_rejected() {
        let creds = service();
        creds.register(&"u1".into(), Role::User, &login("a@example.com")).await.unwrap();
        assert!(creds.unregister("a@example.com").await.unwrap());
        assert!(!creds.unregister("a@example.com").await.unwrap());
        assert_matches!(
            creds.authenticate(&login("a@example.com")).await,
            Err(DepotError::Unauthenticated { .. })
        );
    }
}

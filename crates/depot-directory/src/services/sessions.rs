//! Login and per-request principal resolution

use crate::depot::DepotHandles;
use depot_authorization::Principal;
use depot_core::effects::{
    Authenticated, CredentialService, Credentials, PhysicalTimeEffects, TokenType, UserStore,
};
use depot_core::{DepotError, Result, Role, User, UserId};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Accepted password lengths, in characters
const PASSWORD_LEN: RangeInclusive<usize> = 6..=100;

/// Turns credentials and bearer tokens into principals
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserStore>,
    credentials: Arc<dyn CredentialService>,
    clock: Arc<dyn PhysicalTimeEffects>,
}

impl SessionService {
    pub(crate) fn new(handles: &DepotHandles) -> Self {
        Self {
            users: handles.users.clone(),
            credentials: handles.credentials.clone(),
            clock: handles.clock.clone(),
        }
    }

    /// Self-service sign-up.
    ///
    /// The account starts active with the `pending` role and cannot log in
    /// or create directories until an administrator assigns a real role.
    /// A taken email is `Conflict`.
    pub async fn register(&self, credentials: &Credentials) -> Result<User> {
        self.enroll(credentials, Role::Pending).await
    }

    /// Create the bootstrap super-admin unless the email is already taken.
    ///
    /// Returns `None` when an account with that email exists, whatever its
    /// role.
    pub async fn ensure_admin(&self, credentials: &Credentials) -> Result<Option<User>> {
        if self.users.find_by_email(&credentials.email).await?.is_some() {
            tracing::info!(email = %credentials.email, "admin account already exists");
            return Ok(None);
        }
        self.enroll(credentials, Role::SuperAdmin).await.map(Some)
    }

    async fn enroll(&self, credentials: &Credentials, role: Role) -> Result<User> {
        validate_credentials(credentials)?;
        if self.users.find_by_email(&credentials.email).await?.is_some() {
            return Err(DepotError::conflict(format!(
                "user with email {} already exists",
                credentials.email
            )));
        }

        let user = User {
            id: UserId::generate(),
            email: credentials.email.clone(),
            role,
            is_active: true,
            created_at: self.clock.now().await,
        };
        self.users.create(user.clone()).await?;
        if let Err(err) = self.credentials.register(&user.id, role, credentials).await {
            // Undo the account so the email stays free.
            self.users.delete(&user.id).await?;
            return Err(err);
        }

        tracing::info!(user = %user.id, role = %role, "registered account");
        Ok(user)
    }

    /// Authenticate and return a token pair.
    ///
    /// Inactive accounts and accounts still pending approval are refused
    /// even with valid credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<Authenticated> {
        let authenticated = self.credentials.authenticate(credentials).await?;
        let user = self.current_user(&authenticated).await?;
        if user.role == Role::Pending {
            return Err(DepotError::permission_denied("account is pending approval"));
        }
        tracing::info!(user = %user.id, role = %user.role, "login");
        Ok(Authenticated {
            role: user.role,
            ..authenticated
        })
    }

    /// Resolve a bearer access token to the caller's current principal.
    ///
    /// The role comes from the user store on every call, so a role change
    /// applies to the next request.
    pub async fn resolve(&self, token: &str) -> Result<Principal> {
        let claims = self.credentials.decode(token).await?;
        if claims.token_type != TokenType::Access {
            return Err(DepotError::unauthenticated("expected an access token"));
        }
        if claims.expires_at <= self.clock.now().await {
            return Err(DepotError::unauthenticated("token expired"));
        }
        let user = self
            .users
            .get(&claims.subject)
            .await?
            .ok_or_else(|| DepotError::unauthenticated("unknown subject"))?;
        if !user.is_active {
            return Err(DepotError::permission_denied("account is inactive"));
        }
        Ok(Principal::from(&user))
    }

    async fn current_user(&self, authenticated: &Authenticated) -> Result<User> {
        let user = self
            .users
            .get(&authenticated.subject)
            .await?
            .ok_or_else(|| DepotError::unauthenticated("unknown subject"))?;
        if !user.is_active {
            return Err(DepotError::permission_denied("account is inactive"));
        }
        Ok(user)
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    let valid_email = credentials
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(DepotError::validation(format!(
            "invalid email address {:?}",
            credentials.email
        )));
    }
    if !PASSWORD_LEN.contains(&credentials.password.chars().count()) {
        return Err(DepotError::validation(format!(
            "password must be {} to {} characters",
            PASSWORD_LEN.start(),
            PASSWORD_LEN.end()
        )));
    }
    Ok(())
}

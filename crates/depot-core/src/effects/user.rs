//! Account persistence.

use crate::domain::{User, UserUpdate};
use crate::errors::Result;
use crate::identifiers::UserId;
use async_trait::async_trait;

/// Persisted accounts. `email` is unique.
///
/// Role and active flag are mutated outside the core; readers must fetch
/// them per request.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new account; a taken id or email is `Conflict`.
    async fn create(&self, user: User) -> Result<()>;

    /// Fetch one account.
    async fn get(&self, id: &UserId) -> Result<Option<User>>;

    /// Fetch by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Page through accounts.
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<User>>;

    /// Apply an update; returns the updated account.
    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<Option<User>>;

    /// Remove an account; `true` if it existed.
    async fn delete(&self, id: &UserId) -> Result<bool>;
}

//! Wall-clock time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Physical clock used for creation timestamps and token expiry checks.
#[async_trait]
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current instant.
    async fn now(&self) -> DateTime<Utc>;
}

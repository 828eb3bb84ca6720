//! Clock handlers

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use depot_core::effects::PhysicalTimeEffects;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Real wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl PhysicalTimeEffects for SystemClock {
    async fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    /// Start at `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(at)),
        }
    }

    /// Move forward by `by`
    pub async fn advance(&self, by: Duration) {
        let mut now = self.now.write().await;
        *now += by;
    }

    /// Jump to `at`
    pub async fn set(&self, at: DateTime<Utc>) {
        *self.now.write().await = at;
    }
}

#[async_trait]
impl PhysicalTimeEffects for FixedClock {
    async fn now(&self) -> DateTime<Utc> {
        *self.now.read().await
    }
}

//! In-memory account store

use async_trait::async_trait;
use depot_core::effects::UserStore;
use depot_core::{DepotError, Result, User, UserId, UserUpdate};
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory account store with a unique `email`
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    data: Arc<RwLock<IndexMap<UserId, User>>>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: User) -> Result<()> {
        let mut data = self.data.write().await;
        if data.contains_key(&user.id) {
            return Err(DepotError::conflict(format!("user id {} already exists", user.id)));
        }
        if data.values().any(|u| u.email == user.email) {
            return Err(DepotError::conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        data.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.data.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<User>> {
        let data = self.data.read().await;
        Ok(data.values().skip(skip).take(limit).cloned().collect())
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<Option<User>> {
        let mut data = self.data.write().await;
        if let Some(email) = &update.email {
            if data.values().any(|u| &u.email == email && &u.id != id) {
                return Err(DepotError::conflict(format!("email {email} already registered")));
            }
        }
        Ok(data.get_mut(id).map(|user| {
            update.apply_to(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: &UserId) -> Result<bool> {
        Ok(self.data.write().await.shift_remove(id).is_some())
    }
}

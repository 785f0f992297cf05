//! In-memory user store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_entity::user::{NewUser, User};

use super::UserStore;

/// User store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        let email = user.email.to_lowercase();
        if users
            .values()
            .any(|existing| existing.email.to_lowercase() == email)
        {
            return Err(AppError::duplicate_user(
                "A user with this email already exists",
            ));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_lowercase();
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|user| user.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().await.get(&id).cloned())
    }
}

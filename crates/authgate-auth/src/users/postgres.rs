//! PostgreSQL-backed user store.

use async_trait::async_trait;
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_database::repositories::UserRepository;
use authgate_entity::user::{NewUser, User};

use super::UserStore;

/// User store that delegates to [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PgUserStore {
    repo: UserRepository,
}

impl PgUserStore {
    /// Creates a store over the given repository.
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        self.repo.create(&user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.repo.find_by_email(email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.repo.find_by_id(id).await
    }
}

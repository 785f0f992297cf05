//! PostgreSQL-backed refresh token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_database::repositories::RefreshTokenRepository;
use authgate_entity::token::RefreshToken;

use super::RefreshTokenStore;

/// Refresh token store that delegates to [`RefreshTokenRepository`].
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    repo: RefreshTokenRepository,
}

impl PgRefreshTokenStore {
    /// Creates a store over the given repository.
    pub fn new(repo: RefreshTokenRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn save(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        self.repo
            .create(&RefreshToken::new(token_id, user_id, expires_at))
            .await
    }

    async fn find_active(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        self.repo.find_active(token_id).await
    }

    async fn find(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        self.repo.find_by_id(token_id).await
    }

    async fn consume(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        self.repo.consume(token_id).await
    }

    async fn revoke(&self, token_id: Uuid) -> Result<(), AppError> {
        self.repo.revoke(token_id).await
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.repo.revoke_all_for_user(user_id).await
    }

    async fn count_active_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let count = self.repo.count_active_for_user(user_id).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

//! Refresh token repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_entity::token::RefreshToken;

/// Repository for refresh token records.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new record.
    pub async fn create(&self, record: &RefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (id, user_id, issued_at, expires_at, revoked, revoked_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.issued_at)
        .bind(record.expires_at)
        .bind(record.revoked)
        .bind(record.revoked_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to save refresh token", e)
        })
    }

    /// Find a record by ID regardless of its state.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to find refresh token", e)
            })
    }

    /// Find a record that is neither revoked nor expired.
    pub async fn find_active(&self, id: Uuid) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens WHERE id = $1 AND revoked = FALSE AND expires_at > NOW()",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to find refresh token", e)
        })
    }

    /// Revoke a live record and return it, in one statement.
    ///
    /// Of several concurrent callers presenting the same ID, exactly one
    /// receives `Some`.
    pub async fn consume(&self, id: Uuid) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = NOW() \
             WHERE id = $1 AND revoked = FALSE AND expires_at > NOW() RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to consume refresh token", e)
        })
    }

    /// Revoke a record. Revoking an unknown or already revoked record is a no-op.
    pub async fn revoke(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = NOW() \
             WHERE id = $1 AND revoked = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to revoke refresh token", e)
        })?;
        Ok(())
    }

    /// Revoke every live record of a user. Returns the number revoked.
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, revoked_at = NOW() \
             WHERE user_id = $1 AND revoked = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to revoke user tokens", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Count live records of a user.
    pub async fn count_active_for_user(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM refresh_tokens \
             WHERE user_id = $1 AND revoked = FALSE AND expires_at > NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to count refresh tokens", e)
        })
    }
}

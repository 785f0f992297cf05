//! Refresh token persistence contract.
//!
//! The session service only ever talks to [`RefreshTokenStore`]. Two
//! implementations ship with the crate: [`MemoryRefreshTokenStore`] for
//! single-node deployments and tests, and [`PgRefreshTokenStore`] backed by
//! PostgreSQL.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_entity::token::RefreshToken;

pub use memory::MemoryRefreshTokenStore;
pub use postgres::PgRefreshTokenStore;

/// Server-side storage of refresh token records.
///
/// A record is created unrevoked and is only ever mutated to revoke it.
/// Implementations must be safe under concurrent access.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + std::fmt::Debug {
    /// Persists a new unrevoked record.
    async fn save(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError>;

    /// Returns the record only if it exists, is not revoked, and has not expired.
    async fn find_active(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError>;

    /// Returns the record in any state.
    async fn find(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError>;

    /// Revokes the record if it is active and returns it, atomically.
    ///
    /// Of several concurrent calls with the same ID, at most one returns `Some`.
    async fn consume(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError>;

    /// Revokes the record. Absent or already revoked records are not an error.
    async fn revoke(&self, token_id: Uuid) -> Result<(), AppError>;

    /// Revokes every unrevoked record of a user and returns how many changed.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError>;

    /// Counts the active records of a user.
    async fn count_active_for_user(&self, user_id: Uuid) -> Result<u64, AppError>;
}

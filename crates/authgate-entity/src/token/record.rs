//! Persisted refresh token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side record backing one issued refresh token.
///
/// The record only ever moves from `revoked = false` to `revoked = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Token identifier, carried as the `jti` claim of the signed token.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked (rotated or logged out).
    pub revoked: bool,
    /// When the token was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a fresh, unrevoked record issued now.
    pub fn new(id: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            issued_at: Utc::now(),
            expires_at,
            revoked: false,
            revoked_at: None,
        }
    }

    /// Checks whether the record has passed its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Checks whether the record may still be exchanged at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired_at(now)
    }

    /// Marks the record revoked. Returns `false` if it already was.
    pub fn mark_revoked(&mut self, now: DateTime<Utc>) -> bool {
        if self.revoked {
            return false;
        }
        self.revoked = true;
        self.revoked_at = Some(now);
        true
    }
}

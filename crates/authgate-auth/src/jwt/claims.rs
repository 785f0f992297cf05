//! JWT claims carried by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authgate_entity::user::UserRole;

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// User role at issuance.
    pub role: UserRole,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Token type, always [`TokenType::Access`].
    pub typ: TokenType,
}

impl AccessClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Claims embedded in a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject, the user ID.
    pub sub: Uuid,
    /// Identifier of the persisted refresh record.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Token type, always [`TokenType::Refresh`].
    pub typ: TokenType,
}

impl RefreshClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the refresh record ID.
    pub fn token_id(&self) -> Uuid {
        self.jti
    }
}

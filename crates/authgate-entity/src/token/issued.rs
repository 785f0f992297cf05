//! Token value types handed to the transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed token together with its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The raw JWT string.
    pub token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// TTL in seconds at the moment of issuance.
    pub expires_in: u64,
}

impl IssuedToken {
    /// Builds an issued token whose TTL is measured from `issued_at`.
    pub fn new(token: String, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        let expires_in = (expires_at - issued_at).num_seconds().max(0) as u64;
        Self {
            token,
            expires_at,
            expires_in,
        }
    }
}

/// The access/refresh pair produced by login and rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Short-lived access token.
    pub access_token: IssuedToken,
    /// Long-lived refresh token.
    pub refresh_token: IssuedToken,
    /// Identifier of the persisted refresh record.
    pub refresh_token_id: Uuid,
}

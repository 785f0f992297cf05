//! JWT token creation with separate access and refresh keys.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;
use authgate_entity::token::IssuedToken;
use authgate_entity::user::UserRole;

use super::claims::{AccessClaims, RefreshClaims, TokenType};

/// Creates signed access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
}

impl fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.access_token_secret.is_empty() || config.refresh_token_secret.is_empty() {
            return Err(AppError::configuration(
                "Both access and refresh token secrets must be set",
            ));
        }

        let access_ttl = i64::try_from(config.access_token_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes);
        let refresh_ttl = i64::try_from(config.refresh_token_ttl_days)
            .ok()
            .and_then(Duration::try_days);
        let (Some(access_ttl), Some(refresh_ttl)) = (access_ttl, refresh_ttl) else {
            return Err(AppError::configuration("Token TTL is out of range"));
        };

        // Both TTLs must be representable from the current instant onwards.
        let now = Utc::now();
        if now.checked_add_signed(access_ttl).is_none()
            || now.checked_add_signed(refresh_ttl).is_none()
        {
            return Err(AppError::configuration("Token TTL is out of range"));
        }

        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
            issuer: config.issuer.clone(),
        })
    }

    /// Signs an access token for the given user.
    pub fn issue_access(&self, user_id: Uuid, role: UserRole) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = expiry(now, self.access_ttl)?;

        let claims = AccessClaims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            typ: TokenType::Access,
        };

        let token = encode(&Header::default(), &claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken::new(token, now, expires_at))
    }

    /// Signs a refresh token under a freshly generated record ID.
    ///
    /// The caller persists the record under the returned ID with the
    /// token's `expires_at`.
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<(IssuedToken, Uuid), AppError> {
        let now = Utc::now();
        let expires_at = expiry(now, self.refresh_ttl)?;
        let token_id = Uuid::new_v4();

        let claims = RefreshClaims {
            sub: user_id,
            jti: token_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            typ: TokenType::Refresh,
        };

        let token = encode(&Header::default(), &claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok((IssuedToken::new(token, now, expires_at), token_id))
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AppError> {
    now.checked_add_signed(ttl)
        .ok_or_else(|| AppError::internal("Token expiry is out of range"))
}

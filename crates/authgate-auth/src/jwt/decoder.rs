//! JWT token verification.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use authgate_core::config::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::error::TokenError;

/// Verifies access and refresh tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies an access token and returns its claims.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode(token, &self.access_key)?;
        if claims.typ != TokenType::Access {
            return Err(TokenError::Malformed);
        }
        ensure_unexpired(claims.exp)?;
        Ok(claims)
    }

    /// Verifies a refresh token and returns its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode(token, &self.refresh_key)?;
        if claims.typ != TokenType::Refresh {
            return Err(TokenError::Malformed);
        }
        ensure_unexpired(claims.exp)?;
        Ok(claims)
    }

    fn decode<T: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<T, TokenError> {
        let data = decode::<T>(token, key, &self.validation)?;
        Ok(data.claims)
    }
}

// The library accepts a token whose `exp` equals the current second.
fn ensure_unexpired(exp: i64) -> Result<(), TokenError> {
    if exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(())
}

//! Token verification failures.

use thiserror::Error;

use authgate_core::error::AppError;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a well-formed token of the expected kind.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the signing key.
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// The signature is valid but the token is past its expiry.
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind as JwtErrorKind;

        match err.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidSignature => Self::SignatureInvalid,
            _ => Self::Malformed,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::token_expired("Access token has expired"),
            TokenError::SignatureInvalid => AppError::unauthorized("Invalid token signature"),
            TokenError::Malformed => AppError::unauthorized("Invalid token"),
        }
    }
}

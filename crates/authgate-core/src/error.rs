//! Unified application error types for AuthGate.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The core never decides transport
//! status codes; the HTTP boundary maps [`ErrorKind`] to a status.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request fields failed validation.
    Validation,
    /// Unknown email or wrong password. The two causes are never told apart.
    InvalidCredentials,
    /// A user with the same email already exists.
    DuplicateUser,
    /// The presented refresh token is invalid, expired, revoked, or reused.
    InvalidSession,
    /// An access token is missing, malformed, or carries a bad signature.
    Unauthorized,
    /// An access token carries a valid signature but has expired.
    TokenExpired,
    /// The requested resource was not found.
    NotFound,
    /// A storage operation failed.
    Persistence,
    /// The password hashing primitive failed.
    Hashing,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether errors of this kind are server faults rather than caller mistakes.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Persistence
                | Self::Hashing
                | Self::Configuration
                | Self::Serialization
                | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::DuplicateUser => write!(f, "DUPLICATE_USER"),
            Self::InvalidSession => write!(f, "INVALID_SESSION"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Persistence => write!(f, "PERSISTENCE"),
            Self::Hashing => write!(f, "HASHING"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field, as sent by the client.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The unified application error used throughout AuthGate.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Field-level details, populated for validation failures only.
    pub fields: Vec<FieldError>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error carrying one entry per failed field.
    pub fn field_errors(fields: Vec<FieldError>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: "Request validation failed".to_string(),
            fields,
            source: None,
        }
    }

    /// Create a validation error without field attribution.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create the generic invalid-credentials error.
    ///
    /// The message is fixed so that an unknown email and a wrong password
    /// produce byte-identical errors.
    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::InvalidCredentials,
            "Email or password does not match.",
        )
    }

    /// Create a duplicate-user error.
    pub fn duplicate_user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateUser, message)
    }

    /// Create the generic invalid-session error.
    pub fn invalid_session() -> Self {
        Self::new(
            ErrorKind::InvalidSession,
            "Session is invalid or has expired. Please log in again.",
        )
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Persistence, message)
    }

    /// Create a hashing error.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hashing, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            fields: self.fields.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

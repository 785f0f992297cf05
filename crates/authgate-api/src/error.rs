//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use authgate_core::error::{AppError, ErrorKind};

/// Message returned in place of server-side failure details.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// One entry of the error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    /// Machine-readable error code.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub msg: String,
    /// Offending request field, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Where the offending field was sent, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// One or more errors.
    pub errors: Vec<ApiErrorEntry>,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind)
    }
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::InvalidCredentials | ErrorKind::DuplicateUser => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::InvalidSession | ErrorKind::Unauthorized | ErrorKind::TokenExpired => {
            StatusCode::UNAUTHORIZED
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Persistence
        | ErrorKind::Hashing
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);
        let kind = err.kind.to_string();

        let errors = if err.kind.is_server_fault() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Request failed with server error"
            );
            vec![ApiErrorEntry {
                kind,
                msg: INTERNAL_ERROR_MESSAGE.to_string(),
                path: None,
                location: None,
            }]
        } else if !err.fields.is_empty() {
            err.fields
                .into_iter()
                .map(|field| ApiErrorEntry {
                    kind: kind.clone(),
                    msg: field.message,
                    path: Some(field.field),
                    location: Some("body".to_string()),
                })
                .collect()
        } else {
            vec![ApiErrorEntry {
                kind,
                msg: err.message,
                path: None,
                location: None,
            }]
        };

        (status, Json(ApiErrorResponse { errors })).into_response()
    }
}

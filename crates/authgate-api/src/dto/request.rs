//! Request DTOs with validation.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use authgate_auth::NewRegistration;

/// Longest name the users table stores.
const MAX_NAME_CHARS: usize = 100;

/// Cleanup applied to a request body before it is validated.
pub trait Normalize {
    /// Normalizes the fields in place.
    fn normalize(&mut self);
}

/// Account registration request.
///
/// Missing fields deserialize as empty strings so they surface as
/// validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Given name.
    #[serde(default)]
    #[validate(
        length(min = 1, message = "First name is required"),
        custom(function = "within_name_limit")
    )]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Last name is required"),
        custom(function = "within_name_limit")
    )]
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    #[validate(
        email(message = "Email should be a valid email"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    #[validate(length(min = 8, message = "Password length should be at least 8 chars"))]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
        trim_in_place(&mut self.email);
        trim_in_place(&mut self.password);
    }
}

impl From<RegisterRequest> for NewRegistration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    #[validate(email(message = "Email should be a valid email"))]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        trim_in_place(&mut self.email);
        trim_in_place(&mut self.password);
    }
}

fn within_name_limit(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Name must be at most 100 characters")));
    }
    Ok(())
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}

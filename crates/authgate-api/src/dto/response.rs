//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authgate_entity::user::{User, UserRole};

/// Body returned by register, login, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse {
    /// User ID.
    pub id: Uuid,
}

/// Public view of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfResponse {
    /// User ID.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: UserRole,
}

impl From<User> for SelfResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

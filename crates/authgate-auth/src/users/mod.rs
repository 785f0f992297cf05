//! User persistence contract consumed by the session service.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_entity::user::{NewUser, User};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Storage of user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Persists a new user. Fails with `DuplicateUser` when the email is taken,
    /// compared case-insensitively.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    /// Looks a user up by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Looks a user up by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

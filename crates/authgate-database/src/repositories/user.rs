//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_entity::user::{NewUser, User};

/// Repository for user persistence.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to find user", e))
    }

    /// Find a user by email, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to find user by email", e)
            })
    }

    /// Insert a new user.
    ///
    /// A clash on the unique email index is reported as
    /// [`ErrorKind::DuplicateUser`].
    pub async fn create(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::duplicate_user("A user with this email already exists")
            }
            other => AppError::with_source(ErrorKind::Persistence, "Failed to create user", other),
        })
    }
}

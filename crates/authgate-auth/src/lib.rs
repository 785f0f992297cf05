//! # authgate-auth
//!
//! Credential verification and the dual-token session lifecycle.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and verification on the blocking pool
//! - `jwt`: signing and verification of access and refresh tokens
//! - `store`: refresh token persistence contract and its implementations
//! - `users`: user persistence contract and its implementations
//! - `session`: register, login, refresh, and logout orchestration

pub mod jwt;
pub mod password;
pub mod session;
pub mod store;
pub mod users;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims, TokenError};
pub use password::PasswordHasher;
pub use session::{LoginOutcome, NewRegistration, SessionService};
pub use store::{MemoryRefreshTokenStore, PgRefreshTokenStore, RefreshTokenStore};
pub use users::{MemoryUserStore, PgUserStore, UserStore};

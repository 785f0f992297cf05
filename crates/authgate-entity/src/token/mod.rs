//! Refresh token records and issued token value types.

pub mod issued;
pub mod record;

pub use issued::{IssuedToken, SessionTokens};
pub use record::RefreshToken;

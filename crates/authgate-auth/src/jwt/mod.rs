//! JWT signing and verification for access and refresh tokens.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;

pub use claims::{AccessClaims, RefreshClaims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
pub use error::TokenError;

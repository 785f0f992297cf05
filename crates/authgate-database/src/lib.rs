//! # authgate-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for users and refresh tokens.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;

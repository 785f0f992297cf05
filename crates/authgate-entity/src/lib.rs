//! # authgate-entity
//!
//! Domain entity models for AuthGate. Database entities derive
//! `sqlx::FromRow`; token value types are plain serde structs handed to
//! the transport layer.

pub mod token;
pub mod user;

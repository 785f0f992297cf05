//! # authgate-core
//!
//! Core crate for AuthGate. Contains configuration schemas and the
//! unified error system shared by every other crate.
//!
//! This crate has **no** internal dependencies on other AuthGate crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind, FieldError};
pub use result::AppResult;

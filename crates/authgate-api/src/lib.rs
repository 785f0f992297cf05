//! # authgate-api
//!
//! HTTP API layer for AuthGate built on Axum.
//!
//! Provides the `/auth` endpoints, request validation, token cookie
//! assembly, request logging, CORS, and error mapping.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;

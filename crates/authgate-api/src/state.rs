//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use authgate_auth::SessionService;
use authgate_core::config::AppConfig;

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session lifecycle service.
    pub session_service: Arc<SessionService>,
}

impl AppState {
    /// Creates the state from its components.
    pub fn new(config: Arc<AppConfig>, session_service: Arc<SessionService>) -> Self {
        Self {
            config,
            session_service,
        }
    }
}

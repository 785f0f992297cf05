//! CORS layer configuration.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tracing::warn;

use authgate_core::config::CorsConfig;

/// Builds a credentialed CORS layer, or `None` when no origin is configured.
pub fn build_cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}

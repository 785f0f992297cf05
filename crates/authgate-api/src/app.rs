//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    let app = build_router(state).layer(TraceLayer::new_for_http());
    match cors {
        Some(layer) => app.layer(layer),
        None => app,
    }
}

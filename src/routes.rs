//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`, `/create`, `/links`, `POST /links`, `GET /{code}` - session required
//! - `GET/POST /login`, `GET/POST /signup`, `GET /logout`        - public
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Session gate** - Cookie session check with redirect to `/login`
//! - **Path normalization** - Trailing slash handling

use crate::state::AppState;
use crate::web;
use crate::web::middleware::{session_auth, tracing};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// `state` is the shared application state injected into all handlers.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let protected = web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        session_auth::layer,
    ));

    let router = Router::new()
        .merge(protected)
        .merge(web::routes::public_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

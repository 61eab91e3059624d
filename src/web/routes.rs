//! Web route configuration split into protected and public groups.

use crate::state::AppState;
use crate::web::handlers::{
    create_link_handler, create_page_handler, index_handler, list_links_handler, login_handler,
    login_page_handler, logout_handler, redirect_handler, signup_handler, signup_page_handler,
};
use axum::{Router, routing::get};

/// Routes requiring an authenticated session.
///
/// Protected via [`crate::web::middleware::session_auth`]; unauthenticated
/// requests are redirected to `/login` before any handler work happens.
///
/// # Endpoints
///
/// - `GET  /`        - Links overview page
/// - `GET  /create`  - Link creation page
/// - `GET  /links`   - List all links (JSON)
/// - `POST /links`   - Shorten a URL (JSON)
/// - `GET  /{code}`  - Redirect to the stored URL, counting the visit
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/create", get(create_page_handler))
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/{code}", get(redirect_handler))
}

/// Routes reachable without a session.
///
/// # Endpoints
///
/// - `GET  /login`   - Login page
/// - `POST /login`   - Verify credentials, establish session
/// - `GET  /signup`  - Signup page
/// - `POST /signup`  - Create account, establish session
/// - `GET  /logout`  - Destroy session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/signup", get(signup_page_handler).post(signup_handler))
        .route("/logout", get(logout_handler))
}

//! Server-rendered pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the links overview page.
///
/// Renders `templates/index.html`; the page fetches its data via JavaScript
/// from `GET /links`.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {}

/// Template for the link creation form.
#[derive(Template, WebTemplate)]
#[template(path = "create.html")]
struct CreateTemplate {}

/// Template for the login form.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {}

/// Template for the signup form.
#[derive(Template, WebTemplate)]
#[template(path = "signup.html")]
struct SignupTemplate {}

/// Renders the links overview page.
///
/// # Endpoint
///
/// `GET /` (session required)
pub async fn index_handler() -> impl IntoResponse {
    IndexTemplate {}
}

/// Renders the link creation page.
///
/// # Endpoint
///
/// `GET /create` (session required)
pub async fn create_page_handler() -> impl IntoResponse {
    CreateTemplate {}
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login`
pub async fn login_page_handler() -> impl IntoResponse {
    LoginTemplate {}
}

/// Renders the signup page.
///
/// # Endpoint
///
/// `GET /signup`
pub async fn signup_page_handler() -> impl IntoResponse {
    SignupTemplate {}
}

//! Signup, login, and logout handlers.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;
use crate::web::dto::auth::CredentialsRequest;
use crate::web::middleware::session_auth::{SESSION_COOKIE, session_token_from_headers};

/// Builds the `Set-Cookie` value establishing a session.
///
/// No `Max-Age` is set: the cookie lives as long as the browser session and
/// the server-side expiry is what actually bounds the session lifetime.
fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Builds the `Set-Cookie` value clearing the session cookie.
fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Creates an account and logs it in.
///
/// # Endpoint
///
/// `POST /signup`
///
/// # Success
///
/// Creates the user, establishes a session, and redirects to `/`.
///
/// # Failure
///
/// An already-taken username redirects back to `/signup` with no session
/// established; validation and persistence errors surface as error responses.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    match state
        .auth_service
        .signup(&payload.username, &payload.password)
        .await
    {
        Ok((_user, token)) => Ok((
            AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
            Redirect::to("/"),
        )
            .into_response()),
        Err(AppError::Conflict { .. }) => Ok(Redirect::to("/signup").into_response()),
        Err(e) => Err(e),
    }
}

/// Verifies credentials and establishes a session.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Success
///
/// Sets the session cookie and redirects to `/`.
///
/// # Failure
///
/// Bad credentials route back to `/login` with no session established.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    match state
        .auth_service
        .login(&payload.username, &payload.password)
        .await
    {
        Ok(token) => Ok((
            AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
            Redirect::to("/"),
        )
            .into_response()),
        Err(AppError::Unauthorized { .. }) => Ok(Redirect::to("/login").into_response()),
        Err(e) => Err(e),
    }
}

/// Destroys the current session.
///
/// # Endpoint
///
/// `GET /logout`
///
/// Clears the cookie and redirects to `/login`. Logging out without a
/// session is a no-op.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token_from_headers(&headers) {
        state.auth_service.logout(&token).await?;
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login"),
    )
        .into_response())
}

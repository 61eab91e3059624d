//! Cookie-based session authentication middleware.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    http::header::COOKIE,
    middleware::Next,
    response::{Redirect, Response},
};

use crate::application::services::AuthenticatedUser;
use crate::state::AppState;

/// Name of the session cookie carrying the raw token.
pub const SESSION_COOKIE: &str = "session_token";

/// Extracts the raw session token from a request's `Cookie` header.
///
/// Handles multiple cookies by splitting on semicolons and picking the
/// [`SESSION_COOKIE`] key-value pair, ignoring other cookies.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(SESSION_COOKIE), Some(value)) => Some(value.to_string()),
                    _ => None,
                }
            })
        })
}

/// Gates protected routes on a valid session.
///
/// # Authentication Flow
///
/// 1. Extract the [`SESSION_COOKIE`] cookie from the request
/// 2. Validate the token via [`crate::application::services::AuthService`]
/// 3. On success, attach the [`AuthenticatedUser`] as a request extension and
///    continue to the handler
/// 4. On failure or missing cookie, redirect to `/login` without performing
///    any further work
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let token = session_token_from_headers(req.headers());

    match token {
        Some(token) => match st.auth_service.authenticate(&token).await {
            Ok(user) => {
                req.extensions_mut().insert::<AuthenticatedUser>(user);
                Ok(next.run(req).await)
            }
            Err(_) => Err(Redirect::to("/login")),
        },
        None => Err(Redirect::to("/login")),
    }
}

//! Handler for short code redirects.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` (session required)
///
/// # Request Flow
///
/// 1. Look up the link by code
/// 2. Increment its visit counter
/// 3. Return a 307 Temporary Redirect to the stored URL
///
/// The counter update completes before the redirect is sent; a failed
/// increment surfaces as a server error instead of being dropped.
///
/// # Errors
///
/// Returns `404 Not Found` if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.link_service.visit(&code).await?;

    Ok(Redirect::temporary(&url))
}

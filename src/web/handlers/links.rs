//! Link creation and listing handlers.

use axum::{Json, extract::State};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::dto::links::{CreateLinkRequest, LinkResponse};

/// Shortens a URL, or returns the existing link for an already submitted one.
///
/// # Endpoint
///
/// `POST /links` (session required)
///
/// # Request Body
///
/// ```json
/// { "url": "http://roflzoo.com/" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "http://roflzoo.com/",
///   "code": "8a83f",
///   "title": "Funny pictures of animals",
///   "base_url": "https://s.example.com",
///   "visits": 0,
///   "short_url": "https://s.example.com/8a83f"
/// }
/// ```
///
/// # Errors
///
/// Returns `404 Not Found` for input that does not parse as an absolute
/// http(s) URL.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.create_link(&payload.url).await?;

    Ok(Json(link.into()))
}

/// Lists all links in insertion order.
///
/// # Endpoint
///
/// `GET /links` (session required)
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

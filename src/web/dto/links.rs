//! Request/response DTOs for link creation and listing.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Link;

/// Request body for `POST /links`.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: String,
}

/// A link as returned to clients.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
    pub code: String,
    pub title: Option<String>,
    pub base_url: String,
    pub visits: i64,
    pub short_url: String,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        let short_url = link.short_url();
        Self {
            url: link.url,
            code: link.code,
            title: link.title,
            base_url: link.base_url,
            visits: link.visits,
            short_url,
        }
    }
}

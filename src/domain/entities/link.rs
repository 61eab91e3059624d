//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened link with its visit counter and display metadata.
///
/// `code` is derived deterministically from `url`, so a given URL always maps
/// to the same record. `title` is best-effort and may be absent when the
/// remote page could not be fetched at creation time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub code: String,
    pub title: Option<String>,
    pub base_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns the full short URL built from the stored base URL.
    pub fn short_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.code)
    }
}

/// Input data for creating a new link.
///
/// The code is computed by the caller before the record is made durable, so
/// retries of the same URL are idempotent.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub url: String,
    pub code: String,
    pub title: Option<String>,
    pub base_url: String,
}

//! Server-side session record backing cookie authentication.

use chrono::{DateTime, Utc};

/// A session row from the `sessions` table.
///
/// The raw session token lives only in the client cookie; the database stores
/// an HMAC-SHA256 hash of it, so a leaked table cannot be replayed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub token_hash: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Input data for creating a new session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

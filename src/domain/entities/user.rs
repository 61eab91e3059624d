//! User entity for username/password accounts.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// The password is stored only as a salted argon2 hash; the plaintext never
/// leaves the signup/login request path. This type is internal and is never
/// serialized into API responses.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a new user.
///
/// `password_hash` must already be hashed; repositories never see plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

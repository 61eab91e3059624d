//! Account and session management.
//!
//! Passwords are hashed with argon2 before they reach the user repository.
//! Session tokens are random, live only in the client cookie, and are stored
//! as HMAC-SHA256 hashes keyed by a server-side secret, so a read-only leak
//! of the sessions table cannot be replayed.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewSession, NewUser, User};
use crate::domain::repositories::{SessionRepository, UserRepository};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Length of random bytes behind a session token (base64-encodes to 32 chars).
const TOKEN_LENGTH_BYTES: usize = 24;

/// The authenticated identity attached to a request by the session gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Service for signup, login, logout, and per-request authentication.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
    session_ttl: Duration,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` / `sessions` - repositories for DB operations
    /// - `signing_secret` - HMAC key for token hashing; must stay stable
    ///   across restarts or all sessions are invalidated
    /// - `session_ttl` - how long a session stays valid after login
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        signing_secret: String,
        session_ttl: std::time::Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            signing_secret,
            session_ttl: Duration::from_std(session_ttl).unwrap_or_else(|_| Duration::days(7)),
        }
    }

    /// Creates an account and establishes a session for it.
    ///
    /// The password is hashed synchronously before the user record is made
    /// durable. Returns the created user and the raw session token for the
    /// cookie.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username already exists (no
    /// session is established). Returns [`AppError::Internal`] on hashing or
    /// database errors.
    pub async fn signup(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        let token = self.create_session(&user.username).await?;

        Ok((user, token))
    }

    /// Verifies credentials and establishes a session.
    ///
    /// Unknown usernames and wrong passwords produce the same error so the
    /// response does not reveal which part was wrong.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when the credentials do not verify
    /// (no session is established). Returns [`AppError::Internal`] on
    /// database errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let invalid =
            || AppError::unauthorized("Invalid username or password", json!({}));

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&user.password_hash, password) {
            return Err(invalid());
        }

        self.create_session(&user.username).await
    }

    /// Authenticates a raw session token from a cookie.
    ///
    /// Expired sessions are removed as a side effect of being rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for unknown or expired tokens.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_hash = self.hash_token(token);

        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Unknown session" }))
            })?;

        if session.is_expired() {
            let _ = self.sessions.delete_by_token_hash(&token_hash).await;
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Session expired" }),
            ));
        }

        Ok(AuthenticatedUser {
            username: session.username,
        })
    }

    /// Destroys the session behind a raw token.
    ///
    /// Logging out an unknown token is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(token);
        self.sessions.delete_by_token_hash(&token_hash).await
    }

    /// Generates a fresh token and persists the session for `username`.
    async fn create_session(&self, username: &str) -> Result<String, AppError> {
        let token = generate_token();
        let token_hash = self.hash_token(&token);

        self.sessions
            .create(NewSession {
                token_hash,
                username: username.to_string(),
                expires_at: Utc::now() + self.session_ttl,
            })
            .await?;

        Ok(token)
    }

    /// Hashes a raw session token with HMAC-SHA256 using the signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Generates a random session token as URL-safe base64 without padding.
fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Hashes a plaintext password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })
}

/// Verifies a plaintext attempt against a stored argon2 hash.
///
/// An unparseable stored hash verifies as false rather than erroring; it can
/// only mean a corrupted record and must never let a login through.
fn verify_password(stored_hash: &str, attempt: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(attempt.as_bytes(), &parsed)
        .is_ok()
}

//! Repository trait for server-side session storage.

use crate::domain::entities::{NewSession, Session};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for cookie-backed sessions.
///
/// Sessions are keyed by the HMAC hash of the client token; the raw token is
/// never persisted.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError>;

    /// Finds a session by its token hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Deletes a session by its token hash (logout, or expiry cleanup).
    ///
    /// Deleting a missing session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AppError>;

    /// Deletes all expired sessions, returning how many rows were removed.
    ///
    /// Called periodically by the session sweeper.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

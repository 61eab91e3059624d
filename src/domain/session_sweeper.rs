//! Background task removing expired sessions.
//!
//! Expired sessions are also rejected (and deleted) on authentication; the
//! sweeper keeps the table from accumulating rows for clients that never
//! come back.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::repositories::SessionRepository;

/// Runs the periodic expired-session sweep until the process exits.
///
/// Spawned once from [`crate::server::run`]. Sweep failures are logged and
/// retried on the next tick; they never take the service down.
pub async fn run_session_sweeper(repository: Arc<dyn SessionRepository>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so startup is not serialized
    // behind a database round trip.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match repository.delete_expired().await {
            Ok(0) => {}
            Ok(removed) => tracing::debug!("session sweep removed {removed} expired sessions"),
            Err(e) => tracing::warn!("session sweep failed: {e}"),
        }
    }
}

//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};

/// Application-wide state handed to every handler via axum's `State`.
///
/// Services are constructed once at startup (see [`crate::server::run`]) and
/// shared; nothing in here is process-global.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Creates application state from its services.
    pub fn new(link_service: Arc<LinkService>, auth_service: Arc<AuthService>) -> Self {
        Self {
            link_service,
            auth_service,
        }
    }
}

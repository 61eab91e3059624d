//! Business logic services.

mod auth_service;
mod link_service;

pub use auth_service::{AuthService, AuthenticatedUser};
pub use link_service::LinkService;

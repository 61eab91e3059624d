//! Domain layer: entities, repository traits, and background tasks.

pub mod entities;
pub mod repositories;
pub mod session_sweeper;

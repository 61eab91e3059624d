//! Infrastructure layer: database access and external collaborators.

pub mod persistence;
pub mod title_fetcher;

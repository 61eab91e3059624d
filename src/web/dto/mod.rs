//! HTTP request/response DTOs.

pub mod auth;
pub mod links;

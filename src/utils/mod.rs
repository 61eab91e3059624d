//! Shared pure helpers: code derivation and URL validation.

pub mod code_generator;
pub mod url_validator;

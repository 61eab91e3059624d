//! Request DTOs for signup and login.

use serde::Deserialize;
use validator::Validate;

/// Request body for `POST /signup` and `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = 100, message = "username must be 1-100 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 200, message = "password must not be empty"))]
    pub password: String,
}

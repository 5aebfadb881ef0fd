//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 40, message = "login must be 3-40 characters"))]
    pub login: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 5, max = 40, message = "password must be 5-40 characters"))]
    pub password: String,
    /// Requested role names; duplicates are collapsed into a set.
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use super::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::application::auth::{AuthError, AuthService};
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 409, description = "Login or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state
        .auth
        .create_user(
            &request.login,
            &request.email,
            &request.password,
            &request.roles,
        )
        .await
    {
        Ok(()) => Ok((StatusCode::CREATED, Json(ApiResponse::success(())))),
        Err(AuthError::Repository(DomainError::Conflict(msg))) => {
            Err((StatusCode::CONFLICT, Json(ApiResponse::error(msg))))
        }
        Err(AuthError::Repository(DomainError::Validation(msg))) => {
            Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))
        }
        Err(e) => {
            error!(error = %e, "failed to register user");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("internal error")),
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, (StatusCode, Json<ApiResponse<TokenResponse>>)> {
    match state
        .auth
        .create_token(&request.email, &request.password)
        .await
    {
        Ok(token) => Ok(Json(ApiResponse::success(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.auth.token_ttl_hours() * 3600,
        }))),
        // Unknown email and wrong password answer identically.
        Err(AuthError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("invalid credentials")),
        )),
        Err(e) => {
            error!(error = %e, "failed to issue token");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("internal error")),
            ))
        }
    }
}

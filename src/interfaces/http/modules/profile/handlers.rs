//! Profile API handlers
//!
//! All routes here sit behind the auth middleware and read the caller's
//! identity from the request extensions — roles come from the token, not
//! from a fresh database lookup.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::error;

use super::dto::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
use crate::application::profile::ProfileService;
use crate::domain::{DomainError, UpdateUserDto, UserInfo};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Profile handler state
#[derive(Clone)]
pub struct ProfileHandlerState {
    pub profile: Arc<ProfileService>,
}

type HandlerError<T> = (StatusCode, Json<ApiResponse<T>>);

fn unauthenticated<T>() -> HandlerError<T> {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Not authenticated")),
    )
}

fn map_domain_error<T>(context: &str, err: DomainError) -> HandlerError<T> {
    match err {
        DomainError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        DomainError::Conflict(msg) => (StatusCode::CONFLICT, Json(ApiResponse::error(msg))),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))),
        DomainError::Unauthorized(msg) => {
            (StatusCode::UNAUTHORIZED, Json(ApiResponse::error(msg)))
        }
        DomainError::Storage(msg) => {
            error!(error = %msg, "{context}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("internal error")),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    )
)]
pub async fn get_profile(
    State(state): State<ProfileHandlerState>,
    user: Option<Extension<UserInfo>>,
) -> Result<Json<ApiResponse<ProfileResponse>>, HandlerError<ProfileResponse>> {
    let Some(Extension(user)) = user else {
        return Err(unauthenticated());
    };

    let profile = state
        .profile
        .get_profile(user.id)
        .await
        .map_err(|e| map_domain_error("failed to load profile", e))?;

    let mut roles: Vec<String> = profile.roles.into_iter().collect();
    roles.sort();

    Ok(Json(ApiResponse::success(ProfileResponse {
        login: profile.login,
        full_name: profile.full_name,
        email: profile.email,
        roles,
    })))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Login or email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<ProfileHandlerState>,
    user: Option<Extension<UserInfo>>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<()>>, HandlerError<()>> {
    let Some(Extension(user)) = user else {
        return Err(unauthenticated());
    };

    let full_name = match request.full_name {
        Some(name) => {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error("full name empty")),
                ));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let dto = UpdateUserDto {
        login: request.login,
        email: request.email,
        full_name,
    };

    state
        .profile
        .update_profile(user.id, &dto)
        .await
        .map_err(|e| map_domain_error("failed to update profile", e))?;

    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/password",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Invalid current password"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn change_password(
    State(state): State<ProfileHandlerState>,
    user: Option<Extension<UserInfo>>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, HandlerError<()>> {
    let Some(Extension(user)) = user else {
        return Err(unauthenticated());
    };

    state
        .profile
        .change_password(user.id, &request.current_password, &request.new_password)
        .await
        .map_err(|e| map_domain_error("failed to change password", e))?;

    Ok(Json(ApiResponse::success(())))
}

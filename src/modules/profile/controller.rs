use axum::{Json, extract::State};
use tracing::instrument;

use norma_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{UpdateProfileRequest, UserResponse};
use super::service::ProfileService;

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile retrieved", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = ProfileService::get_profile(&state.db, state.cache(), auth_user.user_id()?).await?;
    Ok(Json(UserResponse::new("Profile retrieved successfully", user)))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Email taken, wrong current password or bad jurisdiction", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user =
        ProfileService::update_profile(&state.db, state.cache(), auth_user.user_id()?, dto).await?;
    Ok(Json(UserResponse::new("Profile updated successfully", user)))
}

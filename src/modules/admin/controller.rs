use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use norma_core::{AppError, ErrorResponse, PaginationParams};

use crate::middleware::auth::AuthUser;
use crate::modules::legal_updates::LegalUpdateService;
use crate::modules::profile::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateLegalUpdateRequest, CreateUserRequest, LegalUpdateResponse, MessageResponse,
    UpdateLegalUpdateRequest, UpdateUserRequest, UserResponse, UsersListResponse,
};
use super::service::AdminService;

/// List all users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Users ordered by id", body = UsersListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<UsersListResponse>, AppError> {
    Ok(Json(AdminService::list_users(&state.db, params).await?))
}

/// Create a user with an optional role
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Email taken or invalid role", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AdminService::create_user(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new("User created successfully", user)),
    ))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let user = ProfileService::find_user(&state.db, id).await?;
    Ok(Json(UserResponse::new("User retrieved successfully", user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Email taken or invalid role", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AdminService::update_user(&state.db, state.cache(), id, dto).await?;
    Ok(Json(UserResponse::new("User updated successfully", user)))
}

/// Delete a user with their documents and settings
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete own account", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    AdminService::delete_user(
        &state.db,
        state.storage.as_ref(),
        state.cache(),
        auth_user.user_id()?,
        id,
    )
    .await?;
    Ok(Json(MessageResponse::ok("User deleted successfully")))
}

/// Publish a legal update
#[utoipa::path(
    post,
    path = "/api/admin/legal-updates",
    request_body = CreateLegalUpdateRequest,
    responses(
        (status = 201, description = "Legal update created", body = LegalUpdateResponse),
        (status = 400, description = "Invalid jurisdiction", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_legal_update(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLegalUpdateRequest>,
) -> Result<(StatusCode, Json<LegalUpdateResponse>), AppError> {
    let update =
        LegalUpdateService::create(&state.db, state.cache(), &state.feed_cache, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(LegalUpdateResponse {
            success: true,
            message: "Legal update created successfully".to_string(),
            update,
        }),
    ))
}

/// Edit a legal update
#[utoipa::path(
    put,
    path = "/api/admin/legal-updates/{id}",
    params(("id" = i64, Path, description = "Legal update ID")),
    request_body = UpdateLegalUpdateRequest,
    responses(
        (status = 200, description = "Legal update edited", body = LegalUpdateResponse),
        (status = 400, description = "Invalid jurisdiction", body = ErrorResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_legal_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateLegalUpdateRequest>,
) -> Result<Json<LegalUpdateResponse>, AppError> {
    let update =
        LegalUpdateService::update(&state.db, state.cache(), &state.feed_cache, id, dto).await?;

    Ok(Json(LegalUpdateResponse {
        success: true,
        message: "Legal update updated successfully".to_string(),
        update,
    }))
}

/// Remove a legal update
#[utoipa::path(
    delete,
    path = "/api/admin/legal-updates/{id}",
    params(("id" = i64, Path, description = "Legal update ID")),
    responses(
        (status = 200, description = "Legal update deleted", body = MessageResponse),
        (status = 403, description = "Admin privileges required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_legal_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    LegalUpdateService::delete(&state.db, state.cache(), &state.feed_cache, id).await?;
    Ok(Json(MessageResponse::ok("Legal update deleted successfully")))
}

use axum::{Json, extract::State};
use tracing::instrument;

use norma_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{IntervalResponse, SettingsResponse, UpdateIntervalRequest, UpdateSettingsRequest};
use super::service::SettingsService;

/// Get the current user's settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Settings, created with defaults if missing", body = SettingsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = SettingsService::get_or_create(&state.db, auth_user.user_id()?).await?;

    Ok(Json(SettingsResponse {
        success: true,
        message: "Settings retrieved successfully".to_string(),
        settings,
    }))
}

/// Update the current user's settings
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = SettingsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let settings = SettingsService::update(&state.db, auth_user.user_id()?, dto).await?;

    Ok(Json(SettingsResponse {
        success: true,
        message: "Settings updated successfully".to_string(),
        settings,
    }))
}

/// Set how often the legal feed is refreshed
#[utoipa::path(
    put,
    path = "/api/settings/legal-updates-interval",
    request_body = UpdateIntervalRequest,
    responses(
        (status = 200, description = "Interval updated", body = IntervalResponse),
        (status = 400, description = "Interval below 1 minute", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Settings",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_legal_updates_interval(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateIntervalRequest>,
) -> Result<Json<IntervalResponse>, AppError> {
    let update_interval =
        SettingsService::update_interval(&state.db, auth_user.user_id()?, dto.minutes).await?;

    Ok(Json(IntervalResponse {
        success: true,
        message: "Legal updates interval updated successfully".to_string(),
        update_interval,
    }))
}

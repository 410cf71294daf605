use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use norma_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::modules::profile::ProfileService;
use crate::state::AppState;

use super::model::{
    LegalFeedResponse, LegalSourcesResponse, LegalUpdateFilterParams, LegalUpdateResponse,
    LegalUpdatesArchiveResponse, SourcesQuery,
};
use super::service::LegalUpdateService;

/// Legal news feed for the current user's jurisdictions
#[utoipa::path(
    get,
    path = "/api/legal-updates",
    responses(
        (status = 200, description = "Feed items, newest first", body = LegalFeedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Legal Updates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_legal_feed(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<LegalFeedResponse>, AppError> {
    let user = ProfileService::find_user(&state.db, auth_user.user_id()?).await?;
    let feed = LegalUpdateService::feed(
        &state.db,
        &state.feed_cache,
        &state.legal_feed_config,
        &user,
    )
    .await?;

    Ok(Json(feed))
}

/// Legal news sources, optionally for one jurisdiction
#[utoipa::path(
    get,
    path = "/api/legal-updates/sources",
    params(SourcesQuery),
    responses(
        (status = 200, description = "Sources keyed by jurisdiction", body = LegalSourcesResponse),
        (status = 400, description = "Invalid jurisdiction", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Legal Updates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(_auth_user))]
pub async fn get_legal_sources(
    _auth_user: AuthUser,
    Query(query): Query<SourcesQuery>,
) -> Result<Json<LegalSourcesResponse>, AppError> {
    Ok(Json(LegalUpdateService::sources(
        query.jurisdiction.as_deref(),
    )?))
}

/// Browse stored legal updates
#[utoipa::path(
    get,
    path = "/api/legal-updates/archive",
    params(LegalUpdateFilterParams),
    responses(
        (status = 200, description = "Stored updates, newest first", body = LegalUpdatesArchiveResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Legal Updates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_legal_archive(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<LegalUpdateFilterParams>,
) -> Result<Json<LegalUpdatesArchiveResponse>, AppError> {
    let archive = LegalUpdateService::archive(&state.db, state.cache(), filters).await?;
    Ok(Json(archive))
}

/// Get one stored legal update
#[utoipa::path(
    get,
    path = "/api/legal-updates/{id}",
    params(("id" = i64, Path, description = "Legal update ID")),
    responses(
        (status = 200, description = "Legal update", body = LegalUpdateResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Legal Updates",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_legal_update(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<LegalUpdateResponse>, AppError> {
    let update = LegalUpdateService::get(&state.db, state.cache(), id).await?;

    Ok(Json(LegalUpdateResponse {
        success: true,
        message: "Legal update retrieved successfully".to_string(),
        update,
    }))
}

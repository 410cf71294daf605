use axum::Json;

use super::model::JurisdictionsResponse;
use super::service::JurisdictionService;

/// List the supported jurisdictions
#[utoipa::path(
    get,
    path = "/api/jurisdictions",
    responses(
        (status = 200, description = "Supported jurisdictions", body = JurisdictionsResponse),
        (status = 304, description = "Not modified (matching If-None-Match)")
    ),
    tag = "Jurisdictions"
)]
pub async fn list_jurisdictions() -> Json<JurisdictionsResponse> {
    Json(JurisdictionsResponse {
        success: true,
        message: "Jurisdictions retrieved successfully".to_string(),
        jurisdictions: JurisdictionService::list(),
    })
}

use axum::Json;

use super::model::{HealthResponse, WELCOME_MESSAGE, WelcomeResponse};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = WelcomeResponse)),
    tag = "Health"
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

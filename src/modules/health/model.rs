use serde::Serialize;
use utoipa::ToSchema;

pub const WELCOME_MESSAGE: &str = "Welcome to NORMA AI API";

#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

//! Per-user application settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::UserId;

pub const THEMES: [&str; 2] = ["light", "dark"];
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: UserId,
    pub theme: String,
    pub language: String,
    /// Minutes between legal feed refreshes
    pub legal_updates_interval: i32,
    pub notification_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_theme(theme: &str) -> Result<(), ValidationError> {
    if THEMES.contains(&theme) {
        Ok(())
    } else {
        Err(ValidationError::new("theme").with_message("Theme must be 'light' or 'dark'".into()))
    }
}

/// Partial settings update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_theme"))]
    #[schema(example = "dark")]
    pub theme: Option<String>,
    #[validate(length(min = 2, max = 10, message = "Language must be 2-10 characters"))]
    #[schema(example = "en")]
    pub language: Option<String>,
    #[validate(range(min = 1, message = "Interval must be at least 1 minute"))]
    pub legal_updates_interval: Option<i32>,
    pub notification_enabled: Option<bool>,
}

/// Range is checked by the handler so the error is a 400, not a 422.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateIntervalRequest {
    #[schema(example = 15)]
    pub minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub success: bool,
    pub message: String,
    pub settings: UserSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IntervalResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "updateInterval")]
    pub update_interval: i32,
}

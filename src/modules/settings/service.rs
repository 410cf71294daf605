use sqlx::PgPool;
use tracing::{info, instrument};

use norma_core::AppError;

use super::model::{UpdateSettingsRequest, UserSettings};

const SETTINGS_COLUMNS: &str = "id, user_id, theme, language, legal_updates_interval, \
    notification_enabled, created_at, updated_at";

pub const MIN_INTERVAL_MINUTES: i32 = 1;

pub struct SettingsService;

impl SettingsService {
    /// Settings of `user_id`, inserting the defaults on first access.
    #[instrument(skip(db), fields(db.table = "user_settings"))]
    pub async fn get_or_create(db: &PgPool, user_id: i64) -> Result<UserSettings, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "INSERT INTO user_settings (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(settings)
    }

    /// Stored refresh interval, `None` when the user has no settings row.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "user_settings"))]
    pub async fn interval_for(db: &PgPool, user_id: i64) -> Result<Option<i32>, AppError> {
        let interval = sqlx::query_scalar::<_, i32>(
            "SELECT legal_updates_interval FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(interval)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "user_settings"))]
    pub async fn update(
        db: &PgPool,
        user_id: i64,
        dto: UpdateSettingsRequest,
    ) -> Result<UserSettings, AppError> {
        Self::get_or_create(db, user_id).await?;

        let settings = sqlx::query_as::<_, UserSettings>(&format!(
            "UPDATE user_settings
             SET theme = COALESCE($1, theme),
                 language = COALESCE($2, language),
                 legal_updates_interval = COALESCE($3, legal_updates_interval),
                 notification_enabled = COALESCE($4, notification_enabled),
                 updated_at = NOW()
             WHERE user_id = $5
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(dto.theme)
        .bind(dto.language.map(|l| l.trim().to_lowercase()))
        .bind(dto.legal_updates_interval)
        .bind(dto.notification_enabled)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        info!(user.id = user_id, "Settings updated");
        Ok(settings)
    }

    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "user_settings"))]
    pub async fn update_interval(db: &PgPool, user_id: i64, minutes: i32) -> Result<i32, AppError> {
        if minutes < MIN_INTERVAL_MINUTES {
            return Err(AppError::bad_request("Interval must be at least 1 minute"));
        }

        let interval = sqlx::query_scalar::<_, i32>(
            "INSERT INTO user_settings (user_id, legal_updates_interval) VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET legal_updates_interval = EXCLUDED.legal_updates_interval, updated_at = NOW()
             RETURNING legal_updates_interval",
        )
        .bind(user_id)
        .bind(minutes)
        .fetch_one(db)
        .await?;

        info!(user.id = user_id, minutes = interval, "Legal updates interval changed");
        Ok(interval)
    }
}

use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use norma_cache::{RedisCache, invalidate, keys};
use norma_core::{AppError, hash_password, verify_password};
use norma_models::{USER_COLUMNS, User};

use crate::modules::auth::service::{map_email_conflict, normalize_email};
use crate::modules::jurisdictions::JurisdictionService;

use super::model::UpdateProfileRequest;

pub const USER_NOT_FOUND: &str = "User not found";

/// Trims names, drops blanks and duplicates.
pub fn clean_sources(sources: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(sources.len());
    for source in sources.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !cleaned.iter().any(|c| c == source) {
            cleaned.push(source.to_string());
        }
    }
    cleaned
}

/// Empty strings clear optional text fields.
fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct ProfileService;

impl ProfileService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn find_user(db: &PgPool, user_id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    /// Profile of the current user, read through the cache when enabled.
    #[instrument(skip(db, cache))]
    pub async fn get_profile(
        db: &PgPool,
        cache: Option<&RedisCache>,
        user_id: i64,
    ) -> Result<User, AppError> {
        let cache_key = keys::users::profile(user_id);

        if let Some(cache) = cache
            && let Some(user) = cache.get::<User>(&cache_key).await
        {
            debug!(user.id = user_id, "Profile cache hit");
            return Ok(user);
        }

        let user = Self::find_user(db, user_id).await?;

        if let Some(cache) = cache
            && let Err(e) = cache.set(&cache_key, &user).await
        {
            warn!(error = %e, "Failed to cache profile");
        }

        Ok(user)
    }

    #[instrument(skip(db, cache, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_profile(
        db: &PgPool,
        cache: Option<&RedisCache>,
        user_id: i64,
        dto: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let mut user = Self::find_user(db, user_id).await?;

        if let Some(first_name) = dto.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(company) = dto.company {
            user.company = optional_text(company);
        }

        if let Some(email) = dto.email {
            let email = normalize_email(&email);
            if email != user.email {
                let taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
                )
                .bind(&email)
                .bind(user_id)
                .fetch_one(db)
                .await?;

                if taken {
                    return Err(AppError::bad_request("Email already registered"));
                }
                user.email = email;
            }
        }

        if let Some(new_password) = dto.new_password {
            let current = dto.current_password.unwrap_or_default();
            if !verify_password(&current, &user.password_hash)? {
                warn!(user.id = user_id, "Profile password change with wrong current password");
                return Err(AppError::bad_request("Current password is incorrect"));
            }
            user.password_hash = hash_password(&new_password)?;
        }

        if let Some(primary) = dto.preferred_jurisdiction {
            user.preferred_jurisdiction = match optional_text(primary) {
                Some(code) => Some(JurisdictionService::parse(&code)?.as_str().to_string()),
                None => None,
            };
        }
        if let Some(followed) = dto.preferred_jurisdictions {
            user.preferred_jurisdictions = JurisdictionService::parse_all(&followed)?;
        }
        if let Some(sources) = dto.preferred_legal_sources {
            user.preferred_legal_sources = clean_sources(&sources);
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = $1, password_hash = $2, first_name = $3, last_name = $4, company = $5,
                 preferred_jurisdiction = $6, preferred_jurisdictions = $7,
                 preferred_legal_sources = $8, updated_at = NOW()
             WHERE id = $9
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.company)
        .bind(&user.preferred_jurisdiction)
        .bind(&user.preferred_jurisdictions)
        .bind(&user.preferred_legal_sources)
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        invalidate::user(cache, user_id).await;
        info!(user.id = user_id, "Profile updated");

        Ok(updated)
    }
}

use std::str::FromStr;

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use norma_cache::{RedisCache, invalidate};
use norma_core::{AppError, FileStorage, PaginationMeta, PaginationParams, hash_password};
use norma_models::{USER_COLUMNS, User, UserRole};

use crate::modules::auth::service::{map_email_conflict, normalize_email};
use crate::modules::profile::ProfileService;
use crate::modules::profile::service::USER_NOT_FOUND;

use super::model::{
    CANNOT_DELETE_SELF, CreateUserRequest, INVALID_ROLE, UpdateUserRequest, UsersListResponse,
};

/// Parses a role name, 400 `Invalid role` otherwise.
pub fn parse_role(role: &str) -> Result<UserRole, AppError> {
    UserRole::from_str(role.trim()).map_err(|_| AppError::bad_request(INVALID_ROLE))
}

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn list_users(
        db: &PgPool,
        params: PaginationParams,
    ) -> Result<UsersListResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(UsersListResponse {
            success: true,
            message: "Users retrieved successfully".to_string(),
            users,
            pagination: PaginationMeta::new(total, &params),
        })
    }

    /// Creates a user with the requested role and default settings.
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "users"))]
    pub async fn create_user(db: &PgPool, dto: CreateUserRequest) -> Result<User, AppError> {
        let role = match dto.role.as_deref() {
            Some(role) => parse_role(role)?,
            None => UserRole::User,
        };
        let password_hash = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, company, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(normalize_email(&dto.email))
        .bind(&password_hash)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&dto.company)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_email_conflict)?;

        sqlx::query("INSERT INTO user_settings (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(user.id = %user.id, role = %user.role, "User created by admin");
        Ok(user)
    }

    #[instrument(skip(db, cache, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_user(
        db: &PgPool,
        cache: Option<&RedisCache>,
        user_id: i64,
        dto: UpdateUserRequest,
    ) -> Result<User, AppError> {
        let role = dto.role.as_deref().map(parse_role).transpose()?;
        let mut user = ProfileService::find_user(db, user_id).await?;

        if let Some(email) = dto.email {
            user.email = normalize_email(&email);
        }
        if let Some(first_name) = dto.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if dto.company.is_some() {
            user.company = dto.company;
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(password) = dto.password {
            user.password_hash = hash_password(&password)?;
        }

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET email = $1, first_name = $2, last_name = $3, company = $4, role = $5,
                 password_hash = $6, updated_at = NOW()
             WHERE id = $7
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.company)
        .bind(user.role)
        .bind(&user.password_hash)
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        invalidate::user(cache, user_id).await;

        info!(user.id = user_id, "User updated by admin");
        Ok(updated)
    }

    /// Deletes a user. Documents and settings go with them, and the stored
    /// files of their documents are removed once the rows are gone.
    #[instrument(skip(db, storage, cache), fields(db.operation = "DELETE", db.table = "users"))]
    pub async fn delete_user(
        db: &PgPool,
        storage: &dyn FileStorage,
        cache: Option<&RedisCache>,
        acting_admin_id: i64,
        user_id: i64,
    ) -> Result<(), AppError> {
        if acting_admin_id == user_id {
            return Err(AppError::bad_request(CANNOT_DELETE_SELF));
        }

        let mut tx = db.begin().await?;

        let stored_files = sqlx::query_scalar::<_, String>(
            "DELETE FROM documents WHERE user_id = $1 RETURNING filename",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }

        tx.commit().await?;

        for key in &stored_files {
            if let Err(e) = storage.delete(key).await {
                warn!(error = %e, key = %key, "Failed to delete stored file");
            }
        }

        invalidate::user(cache, user_id).await;

        info!(
            user.id = user_id,
            admin.id = acting_admin_id,
            documents = stored_files.len(),
            "User deleted"
        );
        Ok(())
    }
}

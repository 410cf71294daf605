use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use norma_auth::{Claims, TokenBlocklist, create_access_token};
use norma_config::JwtConfig;
use norma_core::{AppError, hash_password, verify_password};
use norma_models::{USER_COLUMNS, User, UserRole};

use crate::metrics;

use super::model::{LoginRequest, RegisterRequest};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "Email already registered";

/// Emails are stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Maps a unique violation on `users.email` to 400, anything else to 500.
pub fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(EMAIL_TAKEN);
    }
    error!(error = %e, "Database error writing user");
    AppError::database(e)
}

pub struct AuthService;

impl AuthService {
    /// Creates the user and their default settings in one transaction.
    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "users"))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);
        let password_hash = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, company, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&email)
        .bind(&password_hash)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&dto.company)
        .bind(UserRole::User)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation()) {
                warn!(user.email = %email, "Registration with existing email");
            }
            map_email_conflict(e)
        })?;

        sqlx::query("INSERT INTO user_settings (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        metrics::track_user_registered();
        info!(user.id = %user.id, user.email = %user.email, "User registered");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(User, String), AppError> {
        let email = normalize_email(&dto.email);

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(&email)
        .fetch_optional(db)
        .await?;

        let Some(user) = user else {
            debug!(user.email = %email, "Login for unknown email");
            metrics::track_user_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password_hash)? {
            warn!(user.id = %user.id, "Login with wrong password");
            metrics::track_user_login(false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = Self::issue_token(&user, jwt_config)?;
        metrics::track_user_login(true);
        info!(user.id = %user.id, "User logged in");

        Ok((user, token))
    }

    pub fn issue_token(user: &User, jwt_config: &JwtConfig) -> Result<String, AppError> {
        create_access_token(
            user.id.into_inner(),
            &user.email,
            user.role.as_str(),
            jwt_config,
        )
    }

    /// Revokes the token until its own expiry.
    #[instrument(skip(blocklist, claims), fields(user.id = %claims.sub))]
    pub fn logout(blocklist: &TokenBlocklist, claims: &Claims) {
        blocklist.revoke(&claims.jti, claims.exp);
        info!("Access token revoked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn non_unique_errors_are_internal() {
        let err = map_email_conflict(sqlx::Error::RowNotFound);
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn logout_revokes_jti() {
        let blocklist = TokenBlocklist::new();
        let claims = Claims {
            sub: "1".into(),
            email: "a@b.com".into(),
            role: "user".into(),
            jti: "token-1".into(),
            exp: usize::MAX,
            iat: 0,
        };
        AuthService::logout(&blocklist, &claims);
        assert!(blocklist.is_revoked("token-1"));
        assert!(!blocklist.is_revoked("token-2"));
    }
}

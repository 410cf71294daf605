//! Admin authorization.
//!
//! The role is read from the database on every request so a demoted admin
//! loses access immediately, whatever role their token still carries.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::warn;

use norma_core::AppError;
use norma_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const ADMIN_REQUIRED: &str = "Admin privileges required";

/// Current role of a user, `None` if the user no longer exists.
pub async fn current_role(db: &PgPool, user_id: i64) -> Result<Option<UserRole>, AppError> {
    let role = sqlx::query_scalar::<_, UserRole>("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(role)
}

/// Middleware for admin-only routes.
///
/// ```rust,ignore
/// let admin_routes = init_admin_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match check_admin(&state.db, &auth_user).await {
        Ok(()) => {
            parts.extensions.insert(auth_user);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}

async fn check_admin(db: &PgPool, auth_user: &AuthUser) -> Result<(), AppError> {
    let user_id = auth_user.user_id()?;

    match current_role(db, user_id).await? {
        Some(role) if role.is_admin() => Ok(()),
        _ => {
            warn!(user.id = user_id, "Admin access denied");
            Err(AppError::forbidden(ADMIN_REQUIRED))
        }
    }
}

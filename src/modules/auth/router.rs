use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_user, logout_user, register_user};

/// Credential routes. The router puts these behind the strict rate limit.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

/// Logout needs a valid token and is limited like any other API route.
pub fn init_session_router() -> Router<AppState> {
    Router::new().route("/logout", post(logout_user))
}

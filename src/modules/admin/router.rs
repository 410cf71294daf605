use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_legal_update, create_user, delete_legal_update, delete_user, get_user, list_users,
    update_legal_update, update_user,
};

/// Admin routes. The caller layers `require_admin` on top.
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/legal-updates", post(create_legal_update))
        .route(
            "/legal-updates/{id}",
            put(update_legal_update).delete(delete_legal_update),
        )
}

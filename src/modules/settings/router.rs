use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{get_settings, update_legal_updates_interval, update_settings};

pub fn init_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/legal-updates-interval", put(update_legal_updates_interval))
}

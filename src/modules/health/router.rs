use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::health;

/// Mounted under `/api`. The welcome route is registered at the root by the
/// main router.
pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_legal_archive, get_legal_feed, get_legal_sources, get_legal_update};

pub fn init_legal_updates_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_legal_feed))
        .route("/sources", get(get_legal_sources))
        .route("/archive", get(get_legal_archive))
        .route("/{id}", get(get_legal_update))
}

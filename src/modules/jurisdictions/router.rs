use axum::{Router, middleware, routing::get};

use norma_cache::{CacheControlConfig, cache_control, etag_middleware};

use crate::state::AppState;

use super::controller::list_jurisdictions;

/// The catalogue only changes with a deploy, so clients may cache it for an hour.
pub fn init_jurisdictions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jurisdictions))
        .layer(middleware::from_fn(etag_middleware))
        .layer(cache_control(CacheControlConfig::public(3600)))
}

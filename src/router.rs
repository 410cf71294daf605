use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use norma_config::{CorsConfig, IpGovernorConfig};
use norma_core::AppError;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::require_admin;
use crate::middleware::security_headers::with_security_headers;
use crate::modules::admin::init_admin_router;
use crate::modules::auth::{init_auth_router, init_session_router};
use crate::modules::documents::init_documents_router;
use crate::modules::health::controller::welcome;
use crate::modules::health::init_health_router;
use crate::modules::jurisdictions::init_jurisdictions_router;
use crate::modules::legal_updates::init_legal_updates_router;
use crate::modules::profile::init_profile_router;
use crate::modules::settings::init_settings_router;
use crate::state::AppState;

pub const NOT_FOUND: &str = "Resource not found";

async fn not_found() -> AppError {
    AppError::not_found(NOT_FOUND)
}

/// Applies a rate limit bucket when limiting is enabled and the
/// configuration is usable.
fn rate_limited(
    router: Router<AppState>,
    enabled: bool,
    config: Option<IpGovernorConfig>,
    bucket: &str,
) -> Router<AppState> {
    if !enabled {
        return router;
    }
    match config {
        Some(config) => router.layer(GovernorLayer::new(Arc::new(config))),
        None => {
            warn!(bucket, "Invalid rate limit settings, limiting disabled");
            router
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let limits = &state.rate_limit_config;

    // logout shares the general bucket, only credential endpoints are strict
    let auth_router = rate_limited(
        init_auth_router(),
        limits.enabled,
        limits.auth_governor_config(),
        "auth",
    )
    .merge(init_session_router());

    let api = Router::new()
        .merge(init_health_router())
        .nest("/auth", auth_router)
        .nest("/profile", init_profile_router())
        .nest("/settings", init_settings_router())
        .nest(
            "/documents",
            init_documents_router(state.upload_config.max_bytes),
        )
        .nest("/jurisdictions", init_jurisdictions_router())
        .nest("/legal-updates", init_legal_updates_router())
        .nest(
            "/admin",
            init_admin_router()
                .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        );
    let api = rate_limited(
        api,
        limits.enabled,
        limits.general_governor_config(),
        "general",
    );

    let app = Router::new()
        .route("/", get(welcome))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state.clone())
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware));

    with_security_headers(app)
}

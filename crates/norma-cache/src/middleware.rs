//! HTTP caching headers for public, rarely changing endpoints.
//!
//! - [`cache_control`] sets `Cache-Control` unless the handler already did
//! - [`etag_middleware`] hashes the body into an `ETag` and answers
//!   `If-None-Match` with `304 Not Modified`
//!
//! # Example
//!
//! ```ignore
//! use norma_cache::{CacheControlConfig, cache_control, etag_middleware};
//!
//! let catalogue = Router::new()
//!     .route("/jurisdictions", get(list_jurisdictions))
//!     .layer(axum::middleware::from_fn(etag_middleware))
//!     .layer(cache_control(CacheControlConfig::public(3600)));
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

/// `Cache-Control: public, max-age=<n>` for responses any cache may store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheControlConfig {
    pub max_age: u64,
}

impl CacheControlConfig {
    pub fn public(max_age: u64) -> Self {
        Self { max_age }
    }

    pub fn to_header_value(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("public, max-age={}", self.max_age))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
    }
}

/// Fixed header value for [`SetResponseHeaderLayer`].
#[derive(Clone)]
pub struct CacheControlMakeHeader(HeaderValue);

impl<B> tower_http::set_header::MakeHeaderValue<Response<B>> for CacheControlMakeHeader {
    fn make_header_value(&mut self, _message: &Response<B>) -> Option<HeaderValue> {
        Some(self.0.clone())
    }
}

pub fn cache_control(config: CacheControlConfig) -> SetResponseHeaderLayer<CacheControlMakeHeader> {
    SetResponseHeaderLayer::if_not_present(
        CACHE_CONTROL,
        CacheControlMakeHeader(config.to_header_value()),
    )
}

/// Strong ETag from the first 16 bytes of the body's SHA-256.
fn generate_etag(body: &[u8]) -> String {
    let hash = Sha256::digest(body);
    format!("\"{}\"", hex::encode(&hash[..16]))
}

/// Weak comparison: a `W/` prefix on either side is ignored.
fn etags_match(client_etag: &str, server_etag: &str) -> bool {
    let client = client_etag.trim().trim_start_matches("W/");
    let server = server_etag.trim().trim_start_matches("W/");
    client == "*" || client == server
}

fn if_none_match_hits(header: Option<&str>, etag: &str) -> bool {
    header.is_some_and(|value| value.split(',').any(|tag| etags_match(tag, etag)))
}

/// Adds an `ETag` to successful GET responses and short-circuits
/// conditional requests.
///
/// The response body is buffered, so only use it on small payloads.
pub async fn etag_middleware(request: Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let if_none_match = request
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    if !is_get || !response.status().is_success() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "Failed to buffer response body for ETag");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let etag = match parts.headers.get(ETAG).and_then(|v| v.to_str().ok()) {
        Some(existing) => existing.to_string(),
        None => generate_etag(&bytes),
    };

    if if_none_match_hits(if_none_match.as_deref(), &etag) {
        let mut not_modified = StatusCode::NOT_MODIFIED.into_response();
        if let Ok(value) = HeaderValue::from_str(&etag) {
            not_modified.headers_mut().insert(ETAG, value);
        }
        if let Some(cache_control) = parts.headers.get(CACHE_CONTROL) {
            not_modified
                .headers_mut()
                .insert(CACHE_CONTROL, cache_control.clone());
        }
        return not_modified;
    }

    if let Ok(value) = HeaderValue::from_str(&etag) {
        parts.headers.insert(ETAG, value);
    }
    Response::from_parts(parts, Body::from(bytes))
}

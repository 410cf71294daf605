//! Routes that answer before any query runs. These use a lazily connected
//! pool and need no database.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use norma::norma_auth::verify_token;
use norma::norma_config::RateLimitConfig;
use norma::norma_models::UserRole;
use norma::router::init_router;
use serde_json::json;
use tower::ServiceExt;

use common::{
    bearer_for, body_json, get_request, json_request, lazy_pool, test_app, test_state,
    upload_request,
};

#[tokio::test]
async fn welcome_message_at_root() {
    let response = test_app(lazy_pool()).oneshot(get_request("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Welcome to NORMA AI API");
}

#[tokio::test]
async fn health_reports_ok() {
    let response = test_app(lazy_pool())
        .oneshot(get_request("/api/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn every_response_carries_security_headers() {
    let response = test_app(lazy_pool())
        .oneshot(get_request("/api/health", None))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert_eq!(
        headers["strict-transport-security"],
        "max-age=31536000; includeSubDomains"
    );
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let response = test_app(lazy_pool())
        .oneshot(get_request("/api/does-not-exist", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-frame-options"));
    let body = body_json(response).await;
    assert_eq!(body, json!({"success": false, "message": "Resource not found"}));
}

#[tokio::test]
async fn jurisdictions_are_public_and_cacheable() {
    let app = test_app(lazy_pool());

    let response = app
        .clone()
        .oneshot(get_request("/api/jurisdictions", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=3600"
    );
    let etag = response.headers()[header::ETAG].clone();

    let body = body_json(response).await;
    let codes: Vec<&str> = body["jurisdictions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"us-ca"));
    assert!(codes.contains(&"eu"));

    let conditional = Request::builder()
        .uri("/api/jurisdictions")
        .header(header::IF_NONE_MATCH, etag)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(conditional).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn protected_route_requires_token() {
    let response = test_app(lazy_pool())
        .oneshot(get_request("/api/profile", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Missing authorization header");
}

#[tokio::test]
async fn malformed_token_is_rejected() {
    let response = test_app(lazy_pool())
        .oneshot(get_request("/api/documents", Some("Bearer not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_is_rejected() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let claims = verify_token(auth.trim_start_matches("Bearer "), &state.jwt_config).unwrap();
    state.blocklist.revoke(claims.jti, claims.exp);

    let response = init_router(state)
        .oneshot(get_request("/api/profile", Some(&auth)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token has been revoked");
}

#[tokio::test]
async fn register_validation_errors_are_422() {
    let response = test_app(lazy_pool())
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "password": "weak",
                "first_name": "Jane",
                "last_name": "Doe"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Invalid email format"));
    assert!(message.contains("at least 8 characters"));
}

#[tokio::test]
async fn register_missing_field_is_400() {
    let response = test_app(lazy_pool())
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"email": "jane@example.com", "password": "Passw0rd!", "first_name": "Jane"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "last_name is required");
}

#[tokio::test]
async fn interval_below_one_minute_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(json_request(
            "PUT",
            "/api/settings/legal-updates-interval",
            Some(&auth),
            json!({"minutes": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Interval must be at least 1 minute");
}

#[tokio::test]
async fn upload_without_file_part_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(upload_request(&auth, &[("jurisdiction", None, b"eu".as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file part");
}

#[tokio::test]
async fn upload_with_json_body_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(json_request(
            "POST",
            "/api/documents/upload",
            Some(&auth),
            json!({"file": "nda.txt"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file part");
}

#[tokio::test]
async fn upload_with_empty_file_name_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(upload_request(&auth, &[("file", Some(""), b"hello".as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file selected");
}

#[tokio::test]
async fn upload_with_disallowed_extension_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(upload_request(&auth, &[("file", Some("payload.exe"), b"MZ".as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "File type not allowed");
}

#[tokio::test]
async fn upload_with_overlong_jurisdiction_is_400() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);

    let response = init_router(state)
        .oneshot(upload_request(
            &auth,
            &[
                ("file", Some("nda.txt"), b"hello".as_slice()),
                ("jurisdiction", None, b"abcdefghijklmnopqrstuvwxyz".as_slice()),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Jurisdiction code must be at most 20 characters"
    );
}

#[tokio::test]
async fn upload_over_body_limit_is_413() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);
    let oversized = vec![b'a'; state.upload_config.max_bytes + 128 * 1024];

    let response = init_router(state)
        .oneshot(upload_request(&auth, &[("file", Some("big.txt"), oversized.as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn auth_routes_are_rate_limited() {
    let mut state = test_state(lazy_pool());
    state.rate_limit_config = RateLimitConfig {
        enabled: true,
        auth_per_second: 60,
        auth_burst_size: 1,
        ..RateLimitConfig::default()
    };
    let app = init_router(state);

    let login = || {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .header("x-forwarded-for", "192.168.1.100")
            .body(Body::from("{}"))
            .unwrap()
    };

    // the body fails validation, which still consumes the bucket
    let first = app.clone().oneshot(login()).await.unwrap();
    assert_ne!(first.status(), StatusCode::TOO_MANY_REQUESTS);

    let second = app.oneshot(login()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn disabled_rate_limit_never_rejects() {
    let app = test_app(lazy_pool());

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header("content-type", "application/json")
                    .header("x-forwarded-for", "10.0.0.1")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

#[tokio::test]
async fn legal_sources_are_listed_and_filtered() {
    let state = test_state(lazy_pool());
    let auth = bearer_for(&state, 1, "jane@example.com", UserRole::User);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(get_request("/api/legal-updates/sources", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let sources = body["sources"].as_object().unwrap();
    for code in ["us", "uk", "eu", "it", "ca", "au"] {
        assert!(sources.contains_key(code), "{code} missing");
    }
    assert_eq!(body["sources"]["us"][0]["name"], "Federal Register");

    let response = app
        .clone()
        .oneshot(get_request("/api/legal-updates/sources?jurisdiction=EU", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let sources = body["sources"].as_object().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(body["sources"]["eu"][0]["name"], "EUR-Lex");

    let response = app
        .oneshot(get_request("/api/legal-updates/sources?jurisdiction=u5", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

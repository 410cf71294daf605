mod common;

use axum::http::StatusCode;
use norma::norma_models::UserRole;
use norma::router::init_router;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    bearer_for, body_json, create_test_user, generate_unique_email, get_request, json_request,
    test_state,
};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn settings_are_created_with_defaults(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);

    sqlx::query("DELETE FROM user_settings WHERE user_id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = init_router(state)
        .oneshot(get_request("/api/settings", Some(&auth)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["settings"]["theme"], "light");
    assert_eq!(body["settings"]["language"], "en");
    assert_eq!(body["settings"]["legal_updates_interval"], 30);
    assert_eq!(body["settings"]["notification_enabled"], true);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_settings WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn settings_update_validates_and_applies(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings",
            Some(&auth),
            json!({"theme": "solarized"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body_json(response).await["message"]
            .as_str()
            .unwrap()
            .contains("Theme must be 'light' or 'dark'")
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings",
            Some(&auth),
            json!({"language": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings",
            Some(&auth),
            json!({"theme": "dark", "language": "it", "notification_enabled": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["settings"]["theme"], "dark");
    assert_eq!(body["settings"]["language"], "it");
    assert_eq!(body["settings"]["notification_enabled"], false);
    assert_eq!(body["settings"]["legal_updates_interval"], 30);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn interval_update_is_reflected_in_feed(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/settings/legal-updates-interval",
            Some(&auth),
            json!({"minutes": 15}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["updateInterval"], 15);

    let response = app
        .clone()
        .oneshot(get_request("/api/legal-updates", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["updateInterval"], 15);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn feed_keeps_only_preferred_sources(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&auth),
            json!({
                "preferred_jurisdictions": ["us", "eu"],
                "preferred_legal_sources": ["european commission"]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/legal-updates", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["preferredJurisdictions"], json!(["us", "eu"]));
    let updates = body["updates"].as_array().unwrap();
    assert!(!updates.is_empty());
    for item in updates {
        assert_eq!(item["source"], "European Commission");
        assert_eq!(item["jurisdiction"], "eu");
    }
}

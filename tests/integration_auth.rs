mod common;

use axum::http::StatusCode;
use norma::norma_models::UserRole;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    TEST_PASSWORD, body_json, create_test_user, generate_unique_email, get_request, json_request,
    test_app,
};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn register_login_profile_logout(pool: PgPool) {
    let app = test_app(pool.clone());
    let email = generate_unique_email();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": email.to_uppercase(),
                "password": TEST_PASSWORD,
                "first_name": "Jane",
                "last_name": "Doe",
                "company": "Acme"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let settings_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_settings us JOIN users u ON u.id = us.user_id WHERE u.email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(settings_rows, 1);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let auth = format!("Bearer {}", body["access_token"].as_str().unwrap());

    let response = app
        .clone()
        .oneshot(get_request("/api/profile", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["company"], "Acme");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", Some(&auth), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/profile", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn duplicate_email_is_400(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, UserRole::User).await;

    let response = test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "email": email,
                "password": TEST_PASSWORD,
                "first_name": "Jane",
                "last_name": "Doe"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Email already registered");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn wrong_password_is_401(pool: PgPool) {
    let email = generate_unique_email();
    create_test_user(&pool, &email, UserRole::User).await;

    let response = test_app(pool)
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": "Wrong000!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn profile_update_validates_jurisdictions_and_password(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = common::bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let app = norma::router::init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&auth),
            json!({"preferred_jurisdictions": ["EU", "us-ca", "eu"], "preferred_jurisdiction": "uk"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["preferred_jurisdictions"], json!(["eu", "us-ca"]));
    assert_eq!(body["user"]["preferred_jurisdiction"], "uk");

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/profile",
            Some(&auth),
            json!({"current_password": "Wrong000!", "new_password": "N3wPassw0rd!"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Current password is incorrect");
}

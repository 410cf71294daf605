mod common;

use axum::http::{StatusCode, header};
use norma::norma_models::UserRole;
use norma::router::init_router;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    bearer_for, body_json, body_text, create_test_user, generate_unique_email, get_request,
    json_request, test_state, upload_request,
};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn upload_analyze_report_delete(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let upload_dir = state.upload_config.folder.clone();
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(upload_request(
            &auth,
            &[
                (
                    "file",
                    Some("Master Services Agreement.txt"),
                    b"The supplier processes personal data.\nPayment is due in 30 days.\n".as_slice(),
                ),
                ("jurisdiction", None, b"EU".as_slice()),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let document = &body["document"];
    let id = document["id"].as_i64().unwrap();
    let stored_name = document["filename"].as_str().unwrap().to_string();

    assert_eq!(document["jurisdiction"], "eu");
    assert_eq!(document["file_type"], "txt");
    assert!(stored_name.ends_with(&format!("_{}_Master_Services_Agreement.txt", user.id)));
    assert!(["compliant", "non-compliant"].contains(&document["status"].as_str().unwrap()));
    assert!(document["last_analyzed"].is_string());
    assert_eq!(document["compliance_results"]["jurisdiction"], "eu");
    assert!(upload_dir.join(&stored_name).exists());

    let response = app
        .clone()
        .oneshot(get_request("/api/documents?per_page=5", Some(&auth)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["documents"][0]["id"], id);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/documents/{id}/compliance"), Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["compliance_results"]["document_id"], id);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/documents/{id}/analyze"),
            Some(&auth),
            json!({"jurisdiction": "us-ca"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["document"]["jurisdiction"], "us-ca");
    assert_eq!(body["document"]["compliance_results"]["jurisdiction"], "us-ca");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/documents/{id}/report"), Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with(&format!("attachment; filename=\"compliance_report_{id}_")));
    let report = body_text(response).await;
    assert!(report.contains("Document: Master Services Agreement"));

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/api/documents/{id}"))
                .header("authorization", &auth)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!upload_dir.join(&stored_name).exists());

    let response = app
        .oneshot(get_request(&format!("/api/documents/{id}"), Some(&auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(upload_dir);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn upload_defaults_to_preferred_jurisdiction(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    sqlx::query("UPDATE users SET preferred_jurisdiction = 'uk' WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);

    let response = init_router(state)
        .oneshot(upload_request(&auth, &[("file", Some("lease.pdf"), b"%PDF-1.4".as_slice())]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["document"]["jurisdiction"], "uk");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn other_users_documents_are_hidden(pool: PgPool) {
    let state = test_state(pool.clone());
    let owner_email = generate_unique_email();
    let owner = create_test_user(&pool, &owner_email, UserRole::User).await;
    let intruder_email = generate_unique_email();
    let intruder = create_test_user(&pool, &intruder_email, UserRole::User).await;

    let document_id: i64 = sqlx::query_scalar(
        "INSERT INTO documents (filename, original_filename, file_type, file_size, user_id)
         VALUES ('20240101000000_1_a.txt', 'a.txt', 'txt', 1, $1) RETURNING id",
    )
    .bind(owner.id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let owner_auth = bearer_for(&state, owner.id.into_inner(), &owner_email, UserRole::User);
    let intruder_auth =
        bearer_for(&state, intruder.id.into_inner(), &intruder_email, UserRole::User);
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/documents/{document_id}"), Some(&intruder_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Document not found or access denied"
    );

    let response = app
        .oneshot(get_request(
            &format!("/api/documents/{document_id}/report"),
            Some(&owner_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["message"],
        "No compliance analysis results available for this document"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn upload_with_double_dots_in_name_is_stored(pool: PgPool) {
    let state = test_state(pool.clone());
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, UserRole::User).await;
    let auth = bearer_for(&state, user.id.into_inner(), &email, UserRole::User);
    let upload_dir = state.upload_config.folder.clone();

    let response = init_router(state)
        .oneshot(upload_request(
            &auth,
            &[("file", Some("contract..v2.pdf"), b"%PDF-1.4".as_slice())],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["document"]["original_filename"], "contract..v2.pdf");
    let stored = body["document"]["filename"].as_str().unwrap();
    assert!(stored.ends_with("_contract.v2.pdf"));
    assert!(upload_dir.join(stored).exists());

    let _ = std::fs::remove_dir_all(upload_dir);
}

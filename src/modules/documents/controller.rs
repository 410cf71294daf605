use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, Query, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::instrument;

use norma_core::{AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::model::{
    AnalyzeRequest, ComplianceResultsResponse, DocumentFilterParams, DocumentResponse,
    DocumentsListResponse, MessageResponse, NO_ANALYSIS, UploadDocumentForm, UploadedFile,
};
use super::service::DocumentService;

/// Pulls the `file` and `jurisdiction` fields out of an upload.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(UploadedFile, Option<String>), AppError> {
    let mut multipart = multipart.map_err(|_| AppError::bad_request("No file part"))?;
    let mut file = None;
    let mut jurisdiction = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::msg(e.status(), e.body_text()))?
    {
        match field.name() {
            Some("file") => {
                let original_filename = field.file_name().unwrap_or_default().to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::msg(e.status(), e.body_text()))?;
                file = Some(UploadedFile {
                    original_filename,
                    content: content.to_vec(),
                });
            }
            Some("jurisdiction") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::msg(e.status(), e.body_text()))?;
                jurisdiction = Some(value);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::bad_request("No file part"))?;
    if file.original_filename.trim().is_empty() {
        return Err(AppError::bad_request("No file selected"));
    }

    Ok((file, jurisdiction))
}

/// Upload a document and analyze it
#[utoipa::path(
    post,
    path = "/api/documents/upload",
    request_body(content = UploadDocumentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored and analyzed", body = DocumentResponse),
        (status = 400, description = "Missing file, bad extension or jurisdiction", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let user_id = auth_user.user_id()?;
    let (file, jurisdiction) = read_upload(multipart).await?;

    let document = DocumentService::upload(
        &state.db,
        state.storage.as_ref(),
        user_id,
        file,
        jurisdiction.as_deref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::new(
            "Document uploaded and analyzed successfully",
            document,
        )),
    ))
}

/// List the current user's documents
#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentFilterParams),
    responses(
        (status = 200, description = "Documents, newest first", body = DocumentsListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<DocumentFilterParams>,
) -> Result<Json<DocumentsListResponse>, AppError> {
    let response = DocumentService::list(&state.db, auth_user.user_id()?, filters).await?;
    Ok(Json(response))
}

/// Get one of the current user's documents
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document", body = DocumentResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = DocumentService::get_owned(&state.db, auth_user.user_id()?, id).await?;
    Ok(Json(DocumentResponse::new(
        "Document retrieved successfully",
        document,
    )))
}

/// Get the compliance results of a document
#[utoipa::path(
    get,
    path = "/api/documents/{id}/compliance",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Latest compliance results", body = ComplianceResultsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse),
        (status = 409, description = "Document not analyzed yet", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_compliance_results(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ComplianceResultsResponse>, AppError> {
    let document = DocumentService::get_owned(&state.db, auth_user.user_id()?, id).await?;
    let compliance_results = document
        .report()
        .cloned()
        .ok_or_else(|| AppError::conflict(NO_ANALYSIS))?;

    Ok(Json(ComplianceResultsResponse {
        success: true,
        message: "Compliance results retrieved successfully".to_string(),
        document,
        compliance_results,
    }))
}

/// Re-run the compliance analysis
#[utoipa::path(
    post,
    path = "/api/documents/{id}/analyze",
    params(("id" = i64, Path, description = "Document ID")),
    request_body(content = Option<AnalyzeRequest>, description = "Optional new jurisdiction"),
    responses(
        (status = 200, description = "Document re-analyzed", body = DocumentResponse),
        (status = 400, description = "Invalid jurisdiction or body", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, body))]
pub async fn analyze_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<DocumentResponse>, AppError> {
    let request = parse_analyze_request(&body)?;
    let document = DocumentService::reanalyze(
        &state.db,
        state.storage.as_ref(),
        auth_user.user_id()?,
        id,
        request.jurisdiction.as_deref(),
    )
    .await?;

    Ok(Json(DocumentResponse::new(
        "Document analyzed successfully",
        document,
    )))
}

/// An empty body keeps the document's jurisdiction.
fn parse_analyze_request(body: &[u8]) -> Result<AnalyzeRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AnalyzeRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))
}

/// Download the compliance report
#[utoipa::path(
    get,
    path = "/api/documents/{id}/report",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Text report attachment", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse),
        (status = 409, description = "Document not analyzed yet", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn download_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = DocumentService::get_owned(&state.db, auth_user.user_id()?, id).await?;
    let report = DocumentService::render(&document)?;

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.file_name),
        ),
    ];

    Ok((headers, report.body))
}

/// Delete a document and its stored file
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = i64, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Not found or not owned", body = ErrorResponse)
    ),
    tag = "Documents",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    DocumentService::delete(&state.db, state.storage.as_ref(), auth_user.user_id()?, id).await?;
    Ok(Json(MessageResponse::ok("Document deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_analyze_body_keeps_jurisdiction() {
        assert!(parse_analyze_request(b"").unwrap().jurisdiction.is_none());
        assert!(parse_analyze_request(b"  \n").unwrap().jurisdiction.is_none());
    }

    #[test]
    fn analyze_body_reads_jurisdiction() {
        let request = parse_analyze_request(br#"{"jurisdiction": "uk"}"#).unwrap();
        assert_eq!(request.jurisdiction.as_deref(), Some("uk"));
    }

    #[test]
    fn malformed_analyze_body_is_bad_request() {
        let err = parse_analyze_request(b"{not json").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}

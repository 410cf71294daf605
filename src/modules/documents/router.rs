use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    analyze_document, delete_document, download_report, get_compliance_results, get_document,
    list_documents, upload_document,
};

/// `max_upload_bytes` caps multipart bodies. Some slack is left for the
/// multipart framing around the file itself.
pub fn init_documents_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024)),
        )
        .route("/{id}", get(get_document).delete(delete_document))
        .route("/{id}/compliance", get(get_compliance_results))
        .route("/{id}/analyze", post(analyze_document))
        .route("/{id}/report", get(download_report))
}

use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{debug, info, instrument, warn};

use norma_compliance::{
    AnalysisInput, ComplianceAnalyzer, ComplianceReport, Jurisdiction, ReportContext,
    render_report, report_file_name,
};
use norma_core::file_storage::{allowed_extension, stored_filename};
use norma_core::{AppError, FileStorage, PaginationMeta};
use norma_models::{DOCUMENT_COLUMNS, DocumentStatus};

use crate::metrics;
use crate::modules::jurisdictions::JurisdictionService;

use super::model::{
    DOCUMENT_NOT_FOUND, Document, DocumentFilterParams, DocumentsListResponse, NO_ANALYSIS,
    RenderedReport, UploadedFile,
};

pub const DEFAULT_JURISDICTION: &str = "us";

/// Longest original file name kept on a document row.
pub const MAX_ORIGINAL_FILENAME_LEN: usize = 255;

/// Client file name as recorded on the row, shortened to
/// [`MAX_ORIGINAL_FILENAME_LEN`] characters with the extension kept.
pub fn recorded_filename(original: &str) -> String {
    if original.chars().count() <= MAX_ORIGINAL_FILENAME_LEN {
        return original.to_string();
    }

    match original.rsplit_once('.') {
        Some((stem, ext)) if ext.chars().count() < MAX_ORIGINAL_FILENAME_LEN => {
            let keep = MAX_ORIGINAL_FILENAME_LEN - ext.chars().count() - 1;
            let stem: String = stem.chars().take(keep).collect();
            format!("{stem}.{ext}")
        }
        _ => original.chars().take(MAX_ORIGINAL_FILENAME_LEN).collect(),
    }
}

/// Runs the mocked analyzer. Kept synchronous so the thread-local RNG never
/// crosses an await point.
pub fn analyze_content(
    document_id: i64,
    file_type: &str,
    jurisdiction: &Jurisdiction,
    text: Option<&str>,
) -> ComplianceReport {
    let mut input = AnalysisInput::new(document_id, file_type, jurisdiction);
    if let Some(text) = text {
        input = input.with_text(text);
    }
    ComplianceAnalyzer::default().analyze(&input, &mut rand::thread_rng())
}

pub struct DocumentService;

impl DocumentService {
    /// Jurisdiction for a new upload: the form value, else the user's
    /// preferred one, else `us`.
    #[instrument(skip(db))]
    async fn resolve_jurisdiction(
        db: &PgPool,
        user_id: i64,
        requested: Option<&str>,
    ) -> Result<Jurisdiction, AppError> {
        if let Some(code) = requested.map(str::trim).filter(|c| !c.is_empty()) {
            return JurisdictionService::parse(code);
        }

        let preferred = sqlx::query_scalar::<_, Option<String>>(
            "SELECT preferred_jurisdiction FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .flatten();

        match preferred.as_deref().map(Jurisdiction::parse) {
            Some(Ok(jurisdiction)) => Ok(jurisdiction),
            _ => JurisdictionService::parse(DEFAULT_JURISDICTION),
        }
    }

    /// Stores the file, records it and analyzes it straight away.
    ///
    /// The extension is checked before anything touches the database.
    #[instrument(skip(db, storage, file), fields(file.name = %file.original_filename, db.operation = "INSERT", db.table = "documents"))]
    pub async fn upload(
        db: &PgPool,
        storage: &dyn FileStorage,
        user_id: i64,
        file: UploadedFile,
        requested_jurisdiction: Option<&str>,
    ) -> Result<Document, AppError> {
        let file_type = allowed_extension(&file.original_filename)
            .ok_or_else(|| AppError::bad_request("File type not allowed"))?;
        let jurisdiction = Self::resolve_jurisdiction(db, user_id, requested_jurisdiction).await?;

        let key = stored_filename(&file.original_filename, user_id, Utc::now());
        storage
            .save(&key, &file.content)
            .await
            .map_err(|e| e.into_app_error())?;

        let inserted = sqlx::query_as::<_, Document>(&format!(
            "INSERT INTO documents (filename, original_filename, file_type, file_size, status, user_id, jurisdiction)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&key)
        .bind(recorded_filename(&file.original_filename))
        .bind(&file_type)
        .bind(file.content.len() as i64)
        .bind(DocumentStatus::Uploaded)
        .bind(user_id)
        .bind(jurisdiction.as_str())
        .fetch_one(db)
        .await;

        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = storage.delete(&key).await {
                    warn!(error = %cleanup, key = %key, "Failed to remove orphaned upload");
                }
                return Err(e.into());
            }
        };

        info!(document.id = %document.id, key = %key, size = document.file_size, "Document stored");

        let text = Self::extract_text(storage, &document).await;
        Self::record_analysis(db, &document, &jurisdiction, text.as_deref()).await
    }

    /// Plain text of `.txt` uploads. Other formats are analyzed without text.
    async fn extract_text(storage: &dyn FileStorage, document: &Document) -> Option<String> {
        if document.file_type != "txt" {
            return None;
        }

        match storage.read(&document.filename).await {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!(error = %e, document.id = %document.id, "Could not read document text");
                None
            }
        }
    }

    #[instrument(skip(db, document, text), fields(document.id = %document.id, db.operation = "UPDATE", db.table = "documents"))]
    async fn record_analysis(
        db: &PgPool,
        document: &Document,
        jurisdiction: &Jurisdiction,
        text: Option<&str>,
    ) -> Result<Document, AppError> {
        let report = analyze_content(
            document.id.into_inner(),
            &document.file_type,
            jurisdiction,
            text,
        );
        let status = DocumentStatus::after_analysis(report.is_compliant());

        debug!(issues = report.issues_count, status = %status, "Analysis finished");
        metrics::track_document_analyzed(jurisdiction.as_str(), status.as_str());

        let updated = sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents
             SET status = $1, jurisdiction = $2, last_analyzed = $3, compliance_results = $4
             WHERE id = $5
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(status)
        .bind(jurisdiction.as_str())
        .bind(report.analyzed_at)
        .bind(Json(&report))
        .bind(document.id)
        .fetch_one(db)
        .await?;

        Ok(updated)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "documents"))]
    pub async fn list(
        db: &PgPool,
        user_id: i64,
        filters: DocumentFilterParams,
    ) -> Result<DocumentsListResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(user_id)
        .bind(filters.status)
        .fetch_one(db)
        .await?;

        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY upload_date DESC, id DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(filters.status)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(DocumentsListResponse {
            success: true,
            message: "Documents retrieved successfully".to_string(),
            documents,
            pagination: PaginationMeta::new(total, &filters.pagination),
        })
    }

    /// A document owned by `user_id`. Other users' documents are reported
    /// as missing.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "documents"))]
    pub async fn get_owned(
        db: &PgPool,
        user_id: i64,
        document_id: i64,
    ) -> Result<Document, AppError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2"
        ))
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(DOCUMENT_NOT_FOUND))
    }

    /// Re-runs the analysis, switching jurisdiction when one is given.
    #[instrument(skip(db, storage))]
    pub async fn reanalyze(
        db: &PgPool,
        storage: &dyn FileStorage,
        user_id: i64,
        document_id: i64,
        jurisdiction: Option<&str>,
    ) -> Result<Document, AppError> {
        let document = Self::get_owned(db, user_id, document_id).await?;

        let jurisdiction = match jurisdiction.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => JurisdictionService::parse(code)?,
            None => Jurisdiction::parse(&document.jurisdiction)
                .or_else(|_| JurisdictionService::parse(DEFAULT_JURISDICTION))?,
        };

        let text = Self::extract_text(storage, &document).await;
        let updated = Self::record_analysis(db, &document, &jurisdiction, text.as_deref()).await?;

        info!(document.id = document_id, jurisdiction = %jurisdiction, "Document re-analyzed");
        Ok(updated)
    }

    /// Text compliance report of an analyzed document.
    pub fn render(document: &Document) -> Result<RenderedReport, AppError> {
        let report = document
            .report()
            .ok_or_else(|| AppError::conflict(NO_ANALYSIS))?;

        let generated_at = Utc::now();
        let body = render_report(&ReportContext {
            title: document.title(),
            file_name: &document.original_filename,
            document_date: document.upload_date,
            generated_at,
            report,
        });

        Ok(RenderedReport {
            file_name: report_file_name(document.id.into_inner(), generated_at),
            body,
        })
    }

    /// Deletes the row and then the stored file. A file that cannot be
    /// removed is logged, the row is gone either way.
    #[instrument(skip(db, storage), fields(db.operation = "DELETE", db.table = "documents"))]
    pub async fn delete(
        db: &PgPool,
        storage: &dyn FileStorage,
        user_id: i64,
        document_id: i64,
    ) -> Result<(), AppError> {
        let document = Self::get_owned(db, user_id, document_id).await?;

        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document.id)
            .execute(db)
            .await?;

        if let Err(e) = storage.delete(&document.filename).await {
            warn!(error = %e, key = %document.filename, "Failed to delete stored file");
        }

        info!(document.id = document_id, "Document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use norma_compliance::ComplianceStatus;
    use norma_models::{DocumentId, UserId};

    fn document(results: Option<ComplianceReport>) -> Document {
        Document {
            id: DocumentId::from(9),
            filename: "20240101000000_1_nda.txt".to_string(),
            original_filename: "nda.txt".to_string(),
            file_type: "txt".to_string(),
            file_size: 12,
            status: DocumentStatus::Uploaded,
            user_id: UserId::from(1),
            jurisdiction: "eu".to_string(),
            upload_date: Utc::now(),
            last_analyzed: None,
            compliance_results: results.map(Json),
        }
    }

    #[test]
    fn analysis_reports_requested_jurisdiction() {
        let eu = Jurisdiction::parse("eu").unwrap();
        let report = analyze_content(9, "txt", &eu, Some("Personal data is shared.\n"));

        assert_eq!(report.document_id, 9);
        assert_eq!(report.jurisdiction, "eu");
        assert_eq!(report.issues_count, report.issues.len());
        assert_eq!(
            report.compliance_status == ComplianceStatus::Compliant,
            report.issues.is_empty()
        );
    }

    #[test]
    fn long_original_names_are_shortened() {
        assert_eq!(recorded_filename("nda.txt"), "nda.txt");

        let long = format!("{}.pdf", "é".repeat(300));
        let recorded = recorded_filename(&long);
        assert_eq!(recorded.chars().count(), MAX_ORIGINAL_FILENAME_LEN);
        assert!(recorded.ends_with("é.pdf"));

        let no_ext = "x".repeat(400);
        assert_eq!(recorded_filename(&no_ext).len(), MAX_ORIGINAL_FILENAME_LEN);
    }

    #[test]
    fn render_requires_analysis() {
        let err = DocumentService::render(&document(None)).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.error.to_string(), NO_ANALYSIS);
    }

    #[test]
    fn render_names_file_after_document() {
        let eu = Jurisdiction::parse("eu").unwrap();
        let report = analyze_content(9, "txt", &eu, None);
        let rendered = DocumentService::render(&document(Some(report))).unwrap();

        assert!(rendered.file_name.starts_with("compliance_report_9_"));
        assert!(rendered.file_name.ends_with(".txt"));
        assert!(rendered.body.contains("Norma AI Compliance Report"));
        assert!(rendered.body.contains("Document: nda"));
    }
}

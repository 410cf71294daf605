//! Uploaded document models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};

use norma_compliance::ComplianceReport;
use norma_core::{PaginationMeta, PaginationParams};

use crate::enums::DocumentStatus;
use crate::ids::{DocumentId, UserId};

pub const DOCUMENT_COLUMNS: &str = "id, filename, original_filename, file_type, file_size, status, \
     user_id, jurisdiction, upload_date, last_analyzed, compliance_results";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: DocumentId,
    /// Storage key of the uploaded file
    pub filename: String,
    /// File name as sent by the client
    pub original_filename: String,
    /// Lowercase extension: pdf, doc, docx or txt
    pub file_type: String,
    /// Size in bytes
    pub file_size: i64,
    pub status: DocumentStatus,
    pub user_id: UserId,
    #[schema(example = "us-ca")]
    pub jurisdiction: String,
    pub upload_date: DateTime<Utc>,
    pub last_analyzed: Option<DateTime<Utc>>,
    #[schema(value_type = Option<ComplianceReport>)]
    pub compliance_results: Option<Json<ComplianceReport>>,
}

impl Document {
    pub fn report(&self) -> Option<&ComplianceReport> {
        self.compliance_results.as_ref().map(|json| &json.0)
    }

    /// Original file name without its extension, used as the report title.
    pub fn title(&self) -> &str {
        self.original_filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.original_filename)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentFilterParams {
    /// Only documents with this status
    pub status: Option<DocumentStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Optional body of a re-analysis request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Switch the document to this jurisdiction before analysing
    #[schema(example = "eu")]
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub success: bool,
    pub message: String,
    pub document: Document,
}

impl DocumentResponse {
    pub fn new(message: impl Into<String>, document: Document) -> Self {
        Self {
            success: true,
            message: message.into(),
            document,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentsListResponse {
    pub success: bool,
    pub message: String,
    pub documents: Vec<Document>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ComplianceResultsResponse {
    pub success: bool,
    pub message: String,
    pub document: Document,
    pub compliance_results: ComplianceReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(original: &str) -> Document {
        Document {
            id: DocumentId(5),
            filename: "20240101000000_1_contract.pdf".to_string(),
            original_filename: original.to_string(),
            file_type: "pdf".to_string(),
            file_size: 1024,
            status: DocumentStatus::Uploaded,
            user_id: UserId(1),
            jurisdiction: "us".to_string(),
            upload_date: Utc::now(),
            last_analyzed: None,
            compliance_results: None,
        }
    }

    #[test]
    fn title_strips_extension() {
        assert_eq!(document("Master Services Agreement.pdf").title(), "Master Services Agreement");
        assert_eq!(document("archive.v2.docx").title(), "archive.v2");
        assert_eq!(document("README").title(), "README");
        assert_eq!(document(".txt").title(), ".txt");
    }

    #[test]
    fn unanalyzed_document_has_no_report() {
        let doc = document("a.pdf");
        assert!(doc.report().is_none());
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["compliance_results"].is_null());
        assert_eq!(json["status"], "uploaded");
    }

    #[test]
    fn status_filter_parses_from_query() {
        let params: DocumentFilterParams =
            serde_json::from_value(serde_json::json!({"status": "non-compliant", "page": "2"}))
                .unwrap();
        assert_eq!(params.status, Some(DocumentStatus::NonCompliant));
        assert_eq!(params.pagination.page(), 2);
    }
}

use utoipa::ToSchema;

pub use norma_models::{
    AnalyzeRequest, ComplianceResultsResponse, Document, DocumentFilterParams, DocumentResponse,
    DocumentsListResponse, MessageResponse,
};

pub const DOCUMENT_NOT_FOUND: &str = "Document not found or access denied";
pub const NO_ANALYSIS: &str = "No compliance analysis results available for this document";

/// Multipart body of `POST /api/documents/upload`.
#[derive(Debug, ToSchema)]
pub struct UploadDocumentForm {
    /// pdf, doc, docx or txt
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Overrides the user's preferred jurisdiction
    #[schema(example = "us-ca")]
    pub jurisdiction: Option<String>,
}

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_filename: String,
    pub content: Vec<u8>,
}

/// Text report ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub body: String,
}

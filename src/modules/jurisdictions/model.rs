use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JurisdictionInfo {
    #[schema(example = "us-ca")]
    pub code: String,
    #[schema(example = "California")]
    pub name: String,
    #[schema(example = "US-CA")]
    pub display: String,
    /// Laws applied to documents analyzed under this code
    pub law_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JurisdictionsResponse {
    pub success: bool,
    pub message: String,
    pub jurisdictions: Vec<JurisdictionInfo>,
}

pub use norma_models::{
    CreateLegalUpdateRequest, LegalFeedItem, LegalFeedResponse, LegalSourcesResponse, LegalUpdate,
    LegalUpdateFilterParams, LegalUpdateResponse, LegalUpdatesArchiveResponse, SourcesQuery,
    UpdateLegalUpdateRequest,
};

pub const LEGAL_UPDATE_NOT_FOUND: &str = "Legal update not found";

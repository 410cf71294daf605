use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use norma_compliance::{
    CategoryResult, ComplianceCategory, ComplianceIssue, ComplianceReport, ComplianceStatus,
    LawReference, Severity,
};
use norma_core::{ErrorResponse, PaginationMeta, PaginationParams};
use norma_models::{
    AnalyzeRequest, AuthResponse, ComplianceResultsResponse, CreateLegalUpdateRequest,
    CreateUserRequest, Document, DocumentFilterParams, DocumentResponse, DocumentStatus,
    DocumentsListResponse, IntervalResponse, LegalFeedItem, LegalFeedResponse, LegalSource,
    LegalSourcesResponse, LegalUpdate, LegalUpdateFilterParams, LegalUpdateResponse,
    LegalUpdatesArchiveResponse, LoginRequest, MessageResponse, RegisterRequest, SettingsResponse,
    SourceKind, UpdateIntervalRequest, UpdateLegalUpdateRequest, UpdateProfileRequest,
    UpdateSettingsRequest, UpdateUserRequest, User, UserResponse, UserRole, UserSettings,
    UsersListResponse,
};

use crate::modules::documents::UploadDocumentForm;
use crate::modules::health::{HealthResponse, WelcomeResponse};
use crate::modules::jurisdictions::{JurisdictionInfo, JurisdictionsResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::welcome,
        crate::modules::health::controller::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::settings::controller::get_settings,
        crate::modules::settings::controller::update_settings,
        crate::modules::settings::controller::update_legal_updates_interval,
        crate::modules::documents::controller::upload_document,
        crate::modules::documents::controller::list_documents,
        crate::modules::documents::controller::get_document,
        crate::modules::documents::controller::get_compliance_results,
        crate::modules::documents::controller::analyze_document,
        crate::modules::documents::controller::download_report,
        crate::modules::documents::controller::delete_document,
        crate::modules::jurisdictions::controller::list_jurisdictions,
        crate::modules::legal_updates::controller::get_legal_feed,
        crate::modules::legal_updates::controller::get_legal_sources,
        crate::modules::legal_updates::controller::get_legal_archive,
        crate::modules::legal_updates::controller::get_legal_update,
        crate::modules::admin::controller::list_users,
        crate::modules::admin::controller::create_user,
        crate::modules::admin::controller::get_user,
        crate::modules::admin::controller::update_user,
        crate::modules::admin::controller::delete_user,
        crate::modules::admin::controller::create_legal_update,
        crate::modules::admin::controller::update_legal_update,
        crate::modules::admin::controller::delete_legal_update,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            PaginationParams,
            WelcomeResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            User,
            UserRole,
            UserResponse,
            UpdateProfileRequest,
            UserSettings,
            UpdateSettingsRequest,
            UpdateIntervalRequest,
            SettingsResponse,
            IntervalResponse,
            Document,
            DocumentStatus,
            DocumentFilterParams,
            UploadDocumentForm,
            AnalyzeRequest,
            DocumentResponse,
            DocumentsListResponse,
            ComplianceResultsResponse,
            ComplianceReport,
            ComplianceIssue,
            ComplianceStatus,
            ComplianceCategory,
            CategoryResult,
            LawReference,
            Severity,
            JurisdictionInfo,
            JurisdictionsResponse,
            LegalUpdate,
            LegalFeedItem,
            LegalFeedResponse,
            LegalSource,
            SourceKind,
            LegalSourcesResponse,
            LegalUpdateFilterParams,
            LegalUpdatesArchiveResponse,
            LegalUpdateResponse,
            CreateLegalUpdateRequest,
            UpdateLegalUpdateRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UsersListResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Profile", description = "Current user's profile and preferences"),
        (name = "Settings", description = "Per-user settings"),
        (name = "Documents", description = "Document upload and compliance analysis"),
        (name = "Jurisdictions", description = "Supported jurisdictions"),
        (name = "Legal Updates", description = "Legal news feed and archive"),
        (name = "Admin", description = "User and legal update administration")
    ),
    info(
        title = "Norma AI API",
        version = "0.1.0",
        description = "Legal document compliance analysis with a jurisdiction-aware legal news feed.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/auth/register",
            "/api/documents/upload",
            "/api/documents/{id}/report",
            "/api/legal-updates/archive",
            "/api/admin/users/{id}",
            "/api/jurisdictions",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

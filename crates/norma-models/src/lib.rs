//! # Norma Models
//!
//! Domain entities and request/response DTOs for the Norma AI API.
//!
//! # Modules
//!
//! - [`auth`]: Registration and login DTOs
//! - [`documents`]: Uploaded documents and their compliance results
//! - [`enums`]: Text-backed enums (roles, document status)
//! - [`ids`]: Typed `BIGSERIAL` identifiers
//! - [`legal_updates`]: Stored updates, source catalogue and feed items
//! - [`settings`]: Per-user settings
//! - [`users`]: Users and user management DTOs
//!
//! # Example
//!
//! ```ignore
//! use norma_models::{Document, DocumentStatus, USER_COLUMNS, User};
//!
//! let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
//!     .bind(user_id)
//!     .fetch_one(&db)
//!     .await?;
//! ```

pub mod auth;
pub mod documents;
pub mod enums;
pub mod ids;
pub mod legal_updates;
pub mod settings;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use documents::{
    AnalyzeRequest, ComplianceResultsResponse, DOCUMENT_COLUMNS, Document, DocumentFilterParams,
    DocumentResponse, DocumentsListResponse,
};
pub use enums::{DocumentStatus, UnknownVariant, UserRole};
pub use ids::{DocumentId, LegalUpdateId, UserId};
pub use legal_updates::{
    CreateLegalUpdateRequest, LEGAL_UPDATE_COLUMNS, LegalFeedItem, LegalFeedResponse, LegalSource,
    LegalSourcesResponse, LegalUpdate, LegalUpdateFilterParams, LegalUpdateResponse,
    LegalUpdatesArchiveResponse, SourceKind, SourcesQuery, UpdateLegalUpdateRequest,
    fallback_items, source_catalogue, sources_for,
};
pub use settings::{
    IntervalResponse, SettingsResponse, UpdateIntervalRequest, UpdateSettingsRequest, UserSettings,
};
pub use users::{
    CreateUserRequest, USER_COLUMNS, UpdateProfileRequest, UpdateUserRequest, User, UserResponse,
    UsersListResponse,
};

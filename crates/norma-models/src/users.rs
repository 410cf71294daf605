//! User domain models and DTOs.
//!
//! # Core Types
//!
//! - [`User`] - User row; the password hash never leaves the server
//! - [`UserResponse`] / [`UsersListResponse`] - Response envelopes
//!
//! # Request DTOs
//!
//! - [`UpdateProfileRequest`] - Self-service profile edits
//! - [`CreateUserRequest`] / [`UpdateUserRequest`] - Admin user management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use norma_core::PaginationMeta;
use norma_core::validate_password_strength;

use crate::enums::UserRole;
use crate::ids::UserId;

/// Columns selected whenever a full [`User`] is loaded.
pub const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, company, role, \
     preferred_jurisdiction, preferred_jurisdictions, preferred_legal_sources, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub role: UserRole,
    /// Primary jurisdiction, used as the default for new uploads
    #[schema(example = "us-ca")]
    pub preferred_jurisdiction: Option<String>,
    /// Jurisdictions followed in the legal updates feed
    pub preferred_jurisdictions: Vec<String>,
    /// Source names the legal updates feed is restricted to; empty means all
    pub preferred_legal_sources: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Jurisdictions for the legal feed: the followed list plus the primary
    /// jurisdiction, or `us` when neither is set.
    pub fn feed_jurisdictions(&self) -> Vec<String> {
        let mut jurisdictions = self.preferred_jurisdictions.clone();
        if let Some(primary) = self
            .preferred_jurisdiction
            .as_deref()
            .filter(|p| !p.is_empty())
            && !jurisdictions.iter().any(|j| j == primary)
        {
            jurisdictions.push(primary.to_string());
        }

        if jurisdictions.is_empty() {
            jurisdictions.push("us".to_string());
        }
        jurisdictions
    }
}

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Required together with `new_password`
    pub current_password: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: Option<String>,
    #[schema(example = "us-ny")]
    pub preferred_jurisdiction: Option<String>,
    pub preferred_jurisdictions: Option<Vec<String>>,
    pub preferred_legal_sources: Option<Vec<String>>,
}

/// Admin user creation. `role` defaults to `user`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "new.user@example.com")]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "Passw0rd!")]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,
    #[schema(example = "user")]
    pub role: Option<String>,
}

/// Admin user update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,
    pub role: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

impl UserResponse {
    pub fn new(message: impl Into<String>, user: User) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub success: bool,
    pub message: String,
    pub users: Vec<User>,
    pub pagination: PaginationMeta,
}

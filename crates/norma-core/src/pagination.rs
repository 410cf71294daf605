//! Page-based pagination for list endpoints.
//!
//! Clients send `page` (1-indexed, default 1) and `per_page`
//! (clamped to 1..=100, default 10). Responses carry a [`PaginationMeta`]
//! block next to the items.
//!
//! # Example
//!
//! ```ignore
//! async fn list_users(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<UsersResponse>, AppError> {
//!     let users = fetch_users(params.limit(), params.offset()).await?;
//!     let total = count_users().await?;
//!
//!     Ok(Json(UsersResponse {
//!         users,
//!         pagination: PaginationMeta::new(total, &params),
//!     }))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which are treated as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Pagination block included in list responses.
///
/// ```json
/// { "total": 42, "page": 2, "per_page": 10, "total_pages": 5, "has_more": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Current page (1-indexed)
    pub page: i64,
    /// Items per page that was applied
    pub per_page: i64,
    pub total_pages: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let per_page = params.per_page();
        let page = params.page();
        let total = total.max(0);
        let total_pages = (total + per_page - 1) / per_page;

        Self {
            total,
            page,
            per_page,
            total_pages,
            has_more: page < total_pages,
        }
    }
}

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.per_page()
    }

    /// SQL `OFFSET` derived from the page number. Saturates on huge pages.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

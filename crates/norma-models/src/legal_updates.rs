//! Legal updates: curated database rows, the news source catalogue and the
//! feed items served to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use norma_core::{PaginationMeta, PaginationParams};

use crate::ids::LegalUpdateId;

pub const LEGAL_UPDATE_COLUMNS: &str = "id, title, summary, content, jurisdiction, \
     publication_date, category, source, url, created_at, updated_at";

/// A legal update stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LegalUpdate {
    pub id: LegalUpdateId,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    #[schema(example = "eu")]
    pub jurisdiction: String,
    pub publication_date: DateTime<Utc>,
    #[schema(example = "data_protection")]
    pub category: Option<String>,
    #[schema(example = "EUR-Lex")]
    pub source: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LegalUpdate {
    pub fn to_feed_item(&self) -> LegalFeedItem {
        LegalFeedItem {
            title: self.title.clone(),
            link: self.url.clone().unwrap_or_default(),
            published: self.publication_date,
            source: self.source.clone().unwrap_or_default(),
            summary: self.summary.clone().unwrap_or_default(),
            jurisdiction: self.jurisdiction.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLegalUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    #[schema(example = "us-ca")]
    pub jurisdiction: String,
    /// Defaults to now
    pub publication_date: Option<DateTime<Utc>>,
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
    #[validate(length(max = 100, message = "Source must be at most 100 characters"))]
    pub source: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub url: Option<String>,
}

/// Partial update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLegalUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub jurisdiction: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
    #[validate(length(max = 100, message = "Source must be at most 100 characters"))]
    pub source: Option<String>,
    #[validate(url(message = "Invalid URL"))]
    pub url: Option<String>,
}

/// Archive filters. All are optional and combine with AND.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LegalUpdateFilterParams {
    pub jurisdiction: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive match on title and summary
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SourcesQuery {
    pub jurisdiction: Option<String>,
}

/// One entry of the legal updates feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LegalFeedItem {
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub source: String,
    pub summary: String,
    pub jurisdiction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Rss,
    Scrape,
}

/// A named legal news source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LegalSource {
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub url: &'static str,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

const fn rss(name: &'static str, url: &'static str) -> LegalSource {
    LegalSource {
        name,
        url,
        kind: SourceKind::Rss,
    }
}

static SOURCES: &[(&str, &[LegalSource])] = &[
    (
        "us",
        &[
            rss(
                "Federal Register",
                "https://www.federalregister.gov/api/v1/documents.rss?significant=1",
            ),
            rss(
                "Supreme Court",
                "https://www.supremecourt.gov/rss/slipopinions.aspx",
            ),
            rss(
                "Law360",
                "https://www.law360.com/rss/articles/section_id/3",
            ),
        ],
    ),
    (
        "uk",
        &[
            rss(
                "UK Legislation",
                "https://www.legislation.gov.uk/new/data.feed",
            ),
            rss(
                "UK Supreme Court",
                "https://www.supremecourt.uk/rss/judgments-rss.xml",
            ),
        ],
    ),
    (
        "eu",
        &[
            rss(
                "EUR-Lex",
                "https://eur-lex.europa.eu/rss/legal-content-NEW-REG.xml",
            ),
            LegalSource {
                name: "European Court of Justice",
                url: "https://curia.europa.eu/jcms/jcms/Jo2_7052/en/",
                kind: SourceKind::Scrape,
            },
        ],
    ),
    (
        "it",
        &[rss(
            "Gazzetta Ufficiale",
            "https://www.gazzettaufficiale.it/rss/serie_generale.xml",
        )],
    ),
    (
        "ca",
        &[rss(
            "Department of Justice",
            "https://www.justice.gc.ca/eng/news-nouv/rss.xml",
        )],
    ),
    (
        "au",
        &[rss(
            "Federal Register of Legislation",
            "https://www.legislation.gov.au/WhatsNew/Gazettes/rss",
        )],
    ),
];

/// Sources for one jurisdiction; empty for jurisdictions without any.
pub fn sources_for(jurisdiction: &str) -> &'static [LegalSource] {
    SOURCES
        .iter()
        .find(|(code, _)| *code == jurisdiction)
        .map(|(_, sources)| *sources)
        .unwrap_or(&[])
}

/// The catalogue keyed by jurisdiction, optionally restricted to one.
pub fn source_catalogue(jurisdiction: Option<&str>) -> BTreeMap<String, Vec<LegalSource>> {
    SOURCES
        .iter()
        .filter(|(code, _)| jurisdiction.is_none_or(|j| j == *code))
        .map(|(code, sources)| (code.to_string(), sources.to_vec()))
        .collect()
}

struct Fallback {
    jurisdiction: &'static str,
    title: &'static str,
    link: &'static str,
    source: &'static str,
    summary: &'static str,
}

static FALLBACK: &[Fallback] = &[
    Fallback {
        jurisdiction: "us",
        title: "Privacy Law Amendment for US Businesses",
        link: "https://www.ftc.gov/news-events/news/press-releases",
        source: "Federal Trade Commission",
        summary: "New privacy regulations for businesses operating in the United States.",
    },
    Fallback {
        jurisdiction: "eu",
        title: "GDPR Enforcement Updated in EU Member States",
        link: "https://ec.europa.eu/newsroom/just/items/",
        source: "European Commission",
        summary: "Updates to GDPR enforcement procedures across EU member states.",
    },
    Fallback {
        jurisdiction: "uk",
        title: "UK Data Protection Framework Changes Post-Brexit",
        link: "https://ico.org.uk/about-the-ico/news-and-events/news-and-blogs/",
        source: "Information Commissioner's Office",
        summary: "New data protection framework implemented in the UK following Brexit adjustments.",
    },
    Fallback {
        jurisdiction: "ca",
        title: "Canadian Privacy Law Modernization Act",
        link: "https://www.priv.gc.ca/en/opc-news/news-and-announcements/",
        source: "Office of the Privacy Commissioner of Canada",
        summary: "New modernization act to enhance privacy protections for Canadian citizens.",
    },
    Fallback {
        jurisdiction: "au",
        title: "Australian Consumer Data Right Expansion",
        link: "https://www.accc.gov.au/media-release/",
        source: "Australian Competition & Consumer Commission",
        summary: "Expansion of the Consumer Data Right to additional sectors of the Australian economy.",
    },
    Fallback {
        jurisdiction: "it",
        title: "Italian Data Protection Updates",
        link: "https://www.garanteprivacy.it/home_en/web/guest/home_en",
        source: "Italian Data Protection Authority",
        summary: "New guidelines on data protection compliance for Italian businesses.",
    },
];

/// Placeholder items for a jurisdiction with no stored updates, stamped
/// with `published`.
pub fn fallback_items(jurisdiction: &str, published: DateTime<Utc>) -> Vec<LegalFeedItem> {
    FALLBACK
        .iter()
        .filter(|f| f.jurisdiction == jurisdiction)
        .map(|f| LegalFeedItem {
            title: f.title.to_string(),
            link: f.link.to_string(),
            published,
            source: f.source.to_string(),
            summary: f.summary.to_string(),
            jurisdiction: jurisdiction.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LegalFeedResponse {
    pub success: bool,
    pub message: String,
    pub updates: Vec<LegalFeedItem>,
    /// Refresh interval in minutes
    #[serde(rename = "updateInterval")]
    pub update_interval: i32,
    /// Oldest refresh time among the requested jurisdictions
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
    #[serde(rename = "preferredJurisdictions")]
    pub preferred_jurisdictions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LegalSourcesResponse {
    pub success: bool,
    pub message: String,
    pub sources: BTreeMap<String, Vec<LegalSource>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegalUpdatesArchiveResponse {
    pub success: bool,
    pub message: String,
    pub updates: Vec<LegalUpdate>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegalUpdateResponse {
    pub success: bool,
    pub message: String,
    pub update: LegalUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_lists_known_sources() {
        let names: Vec<_> = sources_for("us").iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Federal Register", "Supreme Court", "Law360"]);
        assert_eq!(sources_for("it")[0].name, "Gazzetta Ufficiale");
        assert!(sources_for("us-ca").is_empty());
    }

    #[test]
    fn catalogue_filter() {
        let all = source_catalogue(None);
        assert_eq!(all.len(), 6);
        let eu = source_catalogue(Some("eu"));
        assert_eq!(eu.len(), 1);
        assert_eq!(eu["eu"][1].kind, SourceKind::Scrape);
        assert!(source_catalogue(Some("xx")).is_empty());
    }

    #[test]
    fn source_kind_serializes_as_type() {
        let json = serde_json::to_value(&sources_for("ca")[0]).unwrap();
        assert_eq!(json["type"], "rss");
        assert_eq!(json["name"], "Department of Justice");
    }

    #[test]
    fn every_catalogued_jurisdiction_has_fallback() {
        let now = Utc::now();
        for code in ["us", "eu", "uk", "ca", "au", "it"] {
            let items = fallback_items(code, now);
            assert_eq!(items.len(), 1, "{code}");
            assert_eq!(items[0].jurisdiction, code);
            assert_eq!(items[0].published, now);
        }
        assert!(fallback_items("us-ny", now).is_empty());
    }

    #[test]
    fn stored_update_becomes_feed_item() {
        let now = Utc::now();
        let update = LegalUpdate {
            id: LegalUpdateId(1),
            title: "New rule".to_string(),
            summary: None,
            content: None,
            jurisdiction: "uk".to_string(),
            publication_date: now,
            category: None,
            source: Some("UK Legislation".to_string()),
            url: None,
            created_at: now,
            updated_at: now,
        };
        let item = update.to_feed_item();
        assert_eq!(item.source, "UK Legislation");
        assert_eq!(item.link, "");
        assert_eq!(item.jurisdiction, "uk");
    }

    #[test]
    fn create_request_rejects_bad_url() {
        let dto = CreateLegalUpdateRequest {
            title: "t".to_string(),
            summary: None,
            content: None,
            jurisdiction: "us".to_string(),
            publication_date: None,
            category: None,
            source: None,
            url: Some("not a url".to_string()),
        };
        assert!(dto.validate().is_err());
    }
}

//! Rows generated by the seeder.

use chrono::{DateTime, Utc};

/// Source recorded on every seeded legal update, used to find them again.
pub const SEED_SOURCE: &str = "Norma Seeder";

/// Categories assigned to seeded updates.
pub const SEED_CATEGORIES: [&str; 7] = [
    "data_protection",
    "consumer_protection",
    "employment",
    "corporate",
    "anti_money_laundering",
    "contract",
    "accessibility",
];

/// Seed data for one `legal_updates` row.
#[derive(Debug, Clone)]
pub struct LegalUpdateSeed {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub jurisdiction: String,
    pub publication_date: DateTime<Utc>,
    pub category: String,
    pub url: String,
}

use crate::env::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalFeedConfig {
    /// Refresh interval used when a user has no settings row.
    pub default_interval_minutes: i32,
    /// Maximum number of items returned by the feed.
    pub max_items: usize,
}

impl LegalFeedConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_interval_minutes: parse_or(
                "LEGAL_UPDATES_INTERVAL_MINUTES",
                defaults.default_interval_minutes,
            )
            .max(1),
            max_items: parse_or("LEGAL_FEED_MAX_ITEMS", defaults.max_items).max(1),
        }
    }
}

impl Default for LegalFeedConfig {
    fn default() -> Self {
        Self {
            default_interval_minutes: 30,
            max_items: 50,
        }
    }
}

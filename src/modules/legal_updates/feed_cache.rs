//! In-process cache of feed items per jurisdiction.
//!
//! Entries carry their refresh time. Readers decide whether an entry is
//! fresh with their own interval, so users with different refresh settings
//! share one cache.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use norma_models::LegalFeedItem;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub items: Vec<LegalFeedItem>,
    pub refreshed_at: DateTime<Utc>,
}

impl FeedEntry {
    pub fn is_fresh(&self, max_age: TimeDelta, now: DateTime<Utc>) -> bool {
        now - self.refreshed_at < max_age
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedCache {
    entries: Arc<RwLock<HashMap<String, FeedEntry>>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `jurisdiction` if it was refreshed less than `max_age` ago.
    pub fn fresh(
        &self,
        jurisdiction: &str,
        max_age: TimeDelta,
        now: DateTime<Utc>,
    ) -> Option<FeedEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(jurisdiction)
            .filter(|entry| entry.is_fresh(max_age, now))
            .cloned()
    }

    pub fn store(
        &self,
        jurisdiction: &str,
        items: Vec<LegalFeedItem>,
        refreshed_at: DateTime<Utc>,
    ) -> FeedEntry {
        let entry = FeedEntry {
            items,
            refreshed_at,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(jurisdiction.to_string(), entry.clone());
        entry
    }

    pub fn invalidate(&self, jurisdiction: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(jurisdiction);
    }

    /// Number of jurisdictions with a cached entry.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use norma_cache::{RedisCache, hash_filters, invalidate, keys};
use norma_config::LegalFeedConfig;
use norma_core::{AppError, PaginationMeta};
use norma_models::{LEGAL_UPDATE_COLUMNS, User, fallback_items, source_catalogue};

use crate::metrics;
use crate::modules::jurisdictions::JurisdictionService;
use crate::modules::settings::SettingsService;

use super::feed_cache::{FeedCache, FeedEntry};
use super::model::{
    CreateLegalUpdateRequest, LEGAL_UPDATE_NOT_FOUND, LegalFeedItem, LegalFeedResponse,
    LegalSourcesResponse, LegalUpdate, LegalUpdateFilterParams, LegalUpdatesArchiveResponse,
    UpdateLegalUpdateRequest,
};

/// Keeps items whose source the user follows. An empty list follows all.
pub fn filter_by_sources(items: Vec<LegalFeedItem>, sources: &[String]) -> Vec<LegalFeedItem> {
    if sources.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| sources.iter().any(|s| s.eq_ignore_ascii_case(&item.source)))
        .collect()
}

/// Newest first, at most `max_items`.
pub fn merge_feed(
    entries: &[FeedEntry],
    sources: &[String],
    max_items: usize,
) -> Vec<LegalFeedItem> {
    let items: Vec<LegalFeedItem> = entries
        .iter()
        .flat_map(|entry| entry.items.iter().cloned())
        .collect();

    let mut items = filter_by_sources(items, sources);
    items.sort_by(|a, b| b.published.cmp(&a.published));
    items.truncate(max_items);
    items
}

/// Oldest refresh time, or `now` when nothing was refreshed.
pub fn last_updated(entries: &[FeedEntry], now: DateTime<Utc>) -> DateTime<Utc> {
    entries
        .iter()
        .map(|entry| entry.refreshed_at)
        .min()
        .unwrap_or(now)
}

fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
}

pub struct LegalUpdateService;

impl LegalUpdateService {
    /// Builds the feed for `user`, refreshing stale jurisdictions.
    #[instrument(skip(db, feed_cache, config, user), fields(user.id = %user.id))]
    pub async fn feed(
        db: &PgPool,
        feed_cache: &FeedCache,
        config: &LegalFeedConfig,
        user: &User,
    ) -> Result<LegalFeedResponse, AppError> {
        let jurisdictions = user.feed_jurisdictions();
        let update_interval = SettingsService::interval_for(db, user.id.into_inner())
            .await?
            .unwrap_or(config.default_interval_minutes)
            .max(1);
        let max_age = TimeDelta::minutes(i64::from(update_interval));
        let now = Utc::now();

        let mut entries = Vec::with_capacity(jurisdictions.len());
        for jurisdiction in &jurisdictions {
            if let Some(entry) = feed_cache.fresh(jurisdiction, max_age, now) {
                metrics::track_legal_feed_cache(true);
                entries.push(entry);
                continue;
            }

            metrics::track_legal_feed_cache(false);
            let items = Self::load_items(db, jurisdiction, config.max_items, now).await?;
            let count = items.len();
            entries.push(feed_cache.store(jurisdiction, items, now));
            debug!(
                jurisdiction = %jurisdiction,
                count,
                cached_jurisdictions = feed_cache.len(),
                "Feed refreshed"
            );
        }

        Ok(LegalFeedResponse {
            success: true,
            message: "Legal updates retrieved successfully".to_string(),
            updates: merge_feed(&entries, &user.preferred_legal_sources, config.max_items),
            update_interval,
            last_updated: last_updated(&entries, now),
            preferred_jurisdictions: jurisdictions,
        })
    }

    /// Stored updates for one jurisdiction as feed items, or the fallback
    /// items when nothing is stored.
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "legal_updates"))]
    async fn load_items(
        db: &PgPool,
        jurisdiction: &str,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<LegalFeedItem>, AppError> {
        let stored = sqlx::query_as::<_, LegalUpdate>(&format!(
            "SELECT {LEGAL_UPDATE_COLUMNS} FROM legal_updates
             WHERE jurisdiction = $1
             ORDER BY publication_date DESC
             LIMIT $2"
        ))
        .bind(jurisdiction)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(db)
        .await?;

        if stored.is_empty() {
            return Ok(fallback_items(jurisdiction, now));
        }
        Ok(stored.iter().map(LegalUpdate::to_feed_item).collect())
    }

    pub fn sources(jurisdiction: Option<&str>) -> Result<LegalSourcesResponse, AppError> {
        let jurisdiction = match jurisdiction.map(str::trim).filter(|j| !j.is_empty()) {
            Some(code) => Some(JurisdictionService::parse(code)?),
            None => None,
        };

        Ok(LegalSourcesResponse {
            success: true,
            message: "Legal sources retrieved successfully".to_string(),
            sources: source_catalogue(jurisdiction.as_ref().map(|j| j.as_str())),
        })
    }

    /// Stored updates, newest first, read through the cache when enabled.
    #[instrument(skip(db, cache, filters), fields(db.operation = "SELECT", db.table = "legal_updates"))]
    pub async fn archive(
        db: &PgPool,
        cache: Option<&RedisCache>,
        filters: LegalUpdateFilterParams,
    ) -> Result<LegalUpdatesArchiveResponse, AppError> {
        let cache_key = keys::legal_updates::archive(&hash_filters(&filters));

        if let Some(cache) = cache
            && let Some(cached) = cache.get::<LegalUpdatesArchiveResponse>(&cache_key).await
        {
            debug!("Archive cache hit");
            return Ok(cached);
        }

        let jurisdiction = filters
            .jurisdiction
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .map(str::to_ascii_lowercase);
        let category = filters
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let search = search_pattern(filters.search.as_deref());

        const WHERE: &str = "($1::text IS NULL OR jurisdiction = $1)
             AND ($2::text IS NULL OR category = $2)
             AND ($3::text IS NULL OR title ILIKE $3 OR summary ILIKE $3)";

        let total =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM legal_updates WHERE {WHERE}"))
                .bind(&jurisdiction)
                .bind(category)
                .bind(&search)
                .fetch_one(db)
                .await?;

        let updates = sqlx::query_as::<_, LegalUpdate>(&format!(
            "SELECT {LEGAL_UPDATE_COLUMNS} FROM legal_updates WHERE {WHERE}
             ORDER BY publication_date DESC, id DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(&jurisdiction)
        .bind(category)
        .bind(&search)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        let response = LegalUpdatesArchiveResponse {
            success: true,
            message: "Legal updates archive retrieved successfully".to_string(),
            updates,
            pagination: PaginationMeta::new(total, &filters.pagination),
        };

        if let Some(cache) = cache
            && let Err(e) = cache.set(&cache_key, &response).await
        {
            warn!(error = %e, "Failed to cache legal updates archive");
        }

        Ok(response)
    }

    #[instrument(skip(db, cache), fields(db.operation = "SELECT", db.table = "legal_updates"))]
    pub async fn get(
        db: &PgPool,
        cache: Option<&RedisCache>,
        update_id: i64,
    ) -> Result<LegalUpdate, AppError> {
        let cache_key = keys::legal_updates::by_id(update_id);

        if let Some(cache) = cache
            && let Some(update) = cache.get::<LegalUpdate>(&cache_key).await
        {
            return Ok(update);
        }

        let update = Self::find(db, update_id).await?;

        if let Some(cache) = cache
            && let Err(e) = cache.set(&cache_key, &update).await
        {
            warn!(error = %e, "Failed to cache legal update");
        }

        Ok(update)
    }

    async fn find(db: &PgPool, update_id: i64) -> Result<LegalUpdate, AppError> {
        sqlx::query_as::<_, LegalUpdate>(&format!(
            "SELECT {LEGAL_UPDATE_COLUMNS} FROM legal_updates WHERE id = $1"
        ))
        .bind(update_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(LEGAL_UPDATE_NOT_FOUND))
    }

    #[instrument(skip(db, cache, feed_cache, dto), fields(db.operation = "INSERT", db.table = "legal_updates"))]
    pub async fn create(
        db: &PgPool,
        cache: Option<&RedisCache>,
        feed_cache: &FeedCache,
        dto: CreateLegalUpdateRequest,
    ) -> Result<LegalUpdate, AppError> {
        let jurisdiction = JurisdictionService::parse(&dto.jurisdiction)?;

        let update = sqlx::query_as::<_, LegalUpdate>(&format!(
            "INSERT INTO legal_updates
                 (title, summary, content, jurisdiction, publication_date, category, source, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {LEGAL_UPDATE_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(&dto.summary)
        .bind(&dto.content)
        .bind(jurisdiction.as_str())
        .bind(dto.publication_date.unwrap_or_else(Utc::now))
        .bind(&dto.category)
        .bind(&dto.source)
        .bind(&dto.url)
        .fetch_one(db)
        .await?;

        feed_cache.invalidate(&update.jurisdiction);
        invalidate::legal_update(cache, None).await;

        info!(update.id = %update.id, jurisdiction = %update.jurisdiction, "Legal update created");
        Ok(update)
    }

    #[instrument(skip(db, cache, feed_cache, dto), fields(db.operation = "UPDATE", db.table = "legal_updates"))]
    pub async fn update(
        db: &PgPool,
        cache: Option<&RedisCache>,
        feed_cache: &FeedCache,
        update_id: i64,
        dto: UpdateLegalUpdateRequest,
    ) -> Result<LegalUpdate, AppError> {
        let mut update = Self::find(db, update_id).await?;
        let previous_jurisdiction = update.jurisdiction.clone();

        if let Some(title) = dto.title {
            update.title = title.trim().to_string();
        }
        if let Some(jurisdiction) = dto.jurisdiction {
            update.jurisdiction = JurisdictionService::parse(&jurisdiction)?.as_str().to_string();
        }
        if let Some(publication_date) = dto.publication_date {
            update.publication_date = publication_date;
        }
        if dto.summary.is_some() {
            update.summary = dto.summary;
        }
        if dto.content.is_some() {
            update.content = dto.content;
        }
        if dto.category.is_some() {
            update.category = dto.category;
        }
        if dto.source.is_some() {
            update.source = dto.source;
        }
        if dto.url.is_some() {
            update.url = dto.url;
        }

        let updated = sqlx::query_as::<_, LegalUpdate>(&format!(
            "UPDATE legal_updates
             SET title = $1, summary = $2, content = $3, jurisdiction = $4,
                 publication_date = $5, category = $6, source = $7, url = $8, updated_at = NOW()
             WHERE id = $9
             RETURNING {LEGAL_UPDATE_COLUMNS}"
        ))
        .bind(&update.title)
        .bind(&update.summary)
        .bind(&update.content)
        .bind(&update.jurisdiction)
        .bind(update.publication_date)
        .bind(&update.category)
        .bind(&update.source)
        .bind(&update.url)
        .bind(update_id)
        .fetch_one(db)
        .await?;

        feed_cache.invalidate(&previous_jurisdiction);
        feed_cache.invalidate(&updated.jurisdiction);
        invalidate::legal_update(cache, Some(update_id)).await;

        info!(update.id = update_id, "Legal update edited");
        Ok(updated)
    }

    #[instrument(skip(db, cache, feed_cache), fields(db.operation = "DELETE", db.table = "legal_updates"))]
    pub async fn delete(
        db: &PgPool,
        cache: Option<&RedisCache>,
        feed_cache: &FeedCache,
        update_id: i64,
    ) -> Result<(), AppError> {
        let jurisdiction = sqlx::query_scalar::<_, String>(
            "DELETE FROM legal_updates WHERE id = $1 RETURNING jurisdiction",
        )
        .bind(update_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(LEGAL_UPDATE_NOT_FOUND))?;

        feed_cache.invalidate(&jurisdiction);
        invalidate::legal_update(cache, Some(update_id)).await;

        info!(update.id = update_id, "Legal update deleted");
        Ok(())
    }
}

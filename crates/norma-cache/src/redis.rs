//! Redis-backed read-through cache for profiles and legal update pages.
//!
//! Values are JSON strings written with `SET EX`. Keys built by
//! [`crate::keys`] are relative and get the configured prefix here. Read
//! failures count as misses so a Redis outage never fails a request.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::CacheConfig;

const SCAN_BATCH: usize = 100;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    ttl: Duration,
    prefix: String,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("ttl", &self.ttl)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Could not encode cached value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RedisCache {
    /// Connects when `REDIS_URL` is configured, `Ok(None)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Redis`] if the URL is invalid or Redis is
    /// unreachable.
    pub async fn from_config(config: &CacheConfig) -> Result<Option<Self>, CacheError> {
        let Some(url) = config.redis_url.as_deref() else {
            return Ok(None);
        };

        let conn = ConnectionManager::new(Client::open(url)?).await?;
        info!(
            cache.ttl_secs = config.default_ttl_seconds,
            cache.prefix = %config.key_prefix,
            "Connected to Redis"
        );

        Ok(Some(Self {
            conn,
            ttl: config.default_ttl(),
            prefix: config.key_prefix.clone(),
        }))
    }

    fn key(&self, key: &str) -> String {
        namespaced(&self.prefix, key)
    }

    /// Cached value under `key`, `None` on a miss or any failure.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let key = self.key(key);
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(raw) => decode(&key, raw.as_deref()),
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Redis GET failed");
                None
            }
        }
    }

    /// Stores `value` under `key` for the configured TTL.
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let key = self.key(key);
        let json = serde_json::to_string(value)?;
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(&key, json, self.ttl.as_secs()).await?;
        debug!(cache.key = %key, "Cached");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let key = self.key(key);
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&key).await?;
        debug!(cache.key = %key, "Invalidated");
        Ok(())
    }

    /// Deletes every key matching a relative glob `pattern`. Returns how
    /// many keys were removed.
    #[instrument(skip(self), fields(cache.operation = "SCAN_DEL"))]
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let pattern = self.key(pattern);
        let mut conn = self.conn.clone();

        let mut matched: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            matched.extend(keys);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        if matched.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn.del(&matched).await?;
        debug!(cache.pattern = %pattern, cache.deleted = deleted, "Invalidated by pattern");
        Ok(deleted)
    }
}

/// `<prefix>:<key>`.
fn namespaced(prefix: &str, key: &str) -> String {
    format!("{prefix}:{key}")
}

/// Parses a cached JSON value. Undecodable entries are logged and treated
/// as misses, which happens after a schema change.
fn decode<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Option<T> {
    let Some(raw) = raw else {
        debug!(cache.key = %key, "Cache miss");
        return None;
    };

    match serde_json::from_str(raw) {
        Ok(value) => {
            debug!(cache.key = %key, "Cache hit");
            Some(value)
        }
        Err(e) => {
            warn!(cache.key = %key, error = %e, "Discarding undecodable cached value");
            None
        }
    }
}

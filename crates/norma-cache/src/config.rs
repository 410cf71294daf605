//! Redis cache configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_TTL_SECONDS: u64 = 300;
pub const DEFAULT_KEY_PREFIX: &str = "norma";

/// Redis cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL. Caching is disabled when unset or empty.
/// - `CACHE_TTL_SECONDS`: TTL for cached items in seconds (default: `300`)
/// - `CACHE_PREFIX`: Prefix for all cache keys (default: `norma`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub redis_url: Option<String>,

    /// Time-to-live for cached items in seconds.
    pub default_ttl_seconds: u64,

    /// Prefix for all cache keys to avoid collisions.
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(DEFAULT_TTL_SECONDS),
            key_prefix: env::var("CACHE_PREFIX")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.into()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            key_prefix: DEFAULT_KEY_PREFIX.into(),
        }
    }
}

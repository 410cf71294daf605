//! # Norma Cache
//!
//! Optional Redis caching and HTTP cache headers for the Norma AI API.
//!
//! - [`RedisCache`]: JSON values with a TTL. Caching is off when `REDIS_URL`
//!   is unset.
//! - [`keys`]: Key layout and invalidation helpers
//! - [`middleware`]: `Cache-Control` and `ETag` for public endpoints
//!
//! # Example
//!
//! ```ignore
//! use norma_cache::{CacheConfig, RedisCache, keys};
//!
//! let cache = RedisCache::from_config(&CacheConfig::from_env()).await?;
//!
//! if let Some(cache) = &cache {
//!     cache.set(&keys::users::profile(user.id), &user).await?;
//! }
//! keys::invalidate::user(cache.as_ref(), user.id).await;
//! ```

pub mod config;
pub mod keys;
pub mod middleware;
pub mod redis;

pub use config::CacheConfig;
pub use keys::{hash_filters, invalidate};
pub use middleware::{CacheControlConfig, cache_control, etag_middleware};
pub use redis::{CacheError, RedisCache};

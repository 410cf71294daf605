//! Cache key generation and invalidation helpers.
//!
//! Keys are relative, [`RedisCache`] adds the configured prefix. Helpers in
//! [`invalidate`] take an `Option<&RedisCache>` so call sites need no
//! branching when caching is disabled.

use crate::RedisCache;
use tracing::warn;

fn build_key(parts: &[&str]) -> String {
    parts.join(":")
}

/// Keys for user data.
pub mod users {
    use super::*;

    /// Cached profile of one user.
    pub fn profile(user_id: i64) -> String {
        build_key(&["user", &user_id.to_string(), "profile"])
    }
}

/// Keys for stored legal updates.
pub mod legal_updates {
    use super::*;

    pub fn by_id(update_id: i64) -> String {
        build_key(&["legal_update", &update_id.to_string()])
    }

    /// Archive page for a hash of the filters.
    pub fn archive(filters_hash: &str) -> String {
        build_key(&["legal_updates", "archive", filters_hash])
    }

    pub fn archive_pattern() -> String {
        build_key(&["legal_updates", "archive", "*"])
    }
}

/// Generates a short, stable key component from filter parameters.
pub fn hash_filters<T: std::hash::Hash>(filters: &T) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    filters.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Invalidation after writes. Failures are logged and swallowed.
pub mod invalidate {
    use super::*;

    /// Call after a user's profile, role or preferences change.
    pub async fn user(cache: Option<&RedisCache>, user_id: i64) {
        let Some(cache) = cache else { return };

        if let Err(e) = cache.invalidate(&users::profile(user_id)).await {
            warn!(error = %e, user_id, "Failed to invalidate user profile cache");
        }
    }

    /// Call after a legal update is created, edited or deleted.
    pub async fn legal_update(cache: Option<&RedisCache>, update_id: Option<i64>) {
        let Some(cache) = cache else { return };

        if let Some(id) = update_id
            && let Err(e) = cache.invalidate(&legal_updates::by_id(id)).await
        {
            warn!(error = %e, update_id = id, "Failed to invalidate legal update cache");
        }

        if let Err(e) = cache
            .invalidate_pattern(&legal_updates::archive_pattern())
            .await
        {
            warn!(error = %e, "Failed to invalidate legal updates archive caches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_key() {
        assert_eq!(users::profile(42), "user:42:profile");
    }

    #[test]
    fn test_legal_update_keys() {
        assert_eq!(legal_updates::by_id(7), "legal_update:7");
        assert_eq!(legal_updates::archive("abc"), "legal_updates:archive:abc");
        assert_eq!(legal_updates::archive_pattern(), "legal_updates:archive:*");
    }

    #[test]
    fn test_hash_filters_consistency() {
        let filters = (Some("eu"), None::<&str>, 1i64);
        assert_eq!(hash_filters(&filters), hash_filters(&filters));
        assert_ne!(hash_filters(&filters), hash_filters(&(Some("us"), None::<&str>, 1i64)));
    }

    #[tokio::test]
    async fn test_invalidate_without_cache_is_noop() {
        invalidate::user(None, 1).await;
        invalidate::legal_update(None, Some(1)).await;
    }
}

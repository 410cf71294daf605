use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use norma_auth::TokenBlocklist;
use norma_cache::{CacheConfig, RedisCache};
use norma_config::{
    CorsConfig, JwtConfig, LegalFeedConfig, RateLimitConfig, ServerConfig, UploadConfig,
};
use norma_core::{FileStorage, LocalFileStorage};

use crate::modules::legal_updates::FeedCache;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub server_config: ServerConfig,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub upload_config: UploadConfig,
    pub legal_feed_config: LegalFeedConfig,
    pub storage: Arc<dyn FileStorage>,
    pub blocklist: TokenBlocklist,
    pub feed_cache: FeedCache,
    /// `None` when `REDIS_URL` is unset or Redis was unreachable at start-up.
    pub cache: Option<RedisCache>,
}

impl AppState {
    /// State around an existing pool with every other setting read from the
    /// environment. Redis is left disabled.
    pub fn with_pool(db: PgPool) -> Self {
        let upload_config = UploadConfig::from_env();
        let storage = LocalFileStorage::new(upload_config.folder.clone(), upload_config.max_bytes);

        Self {
            db,
            server_config: ServerConfig::from_env(),
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            rate_limit_config: RateLimitConfig::from_env(),
            upload_config,
            legal_feed_config: LegalFeedConfig::from_env(),
            storage: Arc::new(storage),
            blocklist: TokenBlocklist::new(),
            feed_cache: FeedCache::new(),
            cache: None,
        }
    }

    pub fn cache(&self) -> Option<&RedisCache> {
        self.cache.as_ref()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = norma_db::init_db_pool().await?;
    norma_db::run_migrations(&db).await?;

    let mut state = AppState::with_pool(db);

    if state.jwt_config.uses_default_secret() {
        warn!("JWT_SECRET_KEY is not set, using the development secret");
    }

    state.cache = match RedisCache::from_config(&CacheConfig::from_env()).await {
        Ok(Some(cache)) => {
            info!("Redis cache enabled");
            Some(cache)
        }
        Ok(None) => {
            info!("Redis cache disabled (REDIS_URL not set)");
            None
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, continuing without cache");
            None
        }
    };

    Ok(state)
}

//! Rate limiting configuration for API endpoints.
//!
//! Rate limits are enforced with the Governor crate using a token bucket:
//! tokens are replenished at the configured rate, each request consumes one
//! and the burst size caps how many can accumulate.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: Set to `false` to disable limiting (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Replenish interval in seconds for general endpoints (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 100)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Replenish interval in seconds for auth endpoints (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for auth endpoints (default: 5)
//!
//! Clients are keyed by IP address. Proxy headers (`X-Forwarded-For`,
//! `X-Real-Ip`, `Forwarded`) are honoured before the peer address.
//!
//! # Example
//!
//! ```ignore
//! let config = RateLimitConfig::from_env();
//!
//! let auth_router = Router::new()
//!     .route("/login", post(login))
//!     .layer(GovernorLayer::new(Arc::new(config.auth_governor_config()?)));
//! ```

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::env::{flag_or, parse_or};

pub type IpGovernorConfig =
    GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>;

/// Rate limit configuration for the API.
///
/// Authentication endpoints get their own, stricter bucket to slow down
/// credential stuffing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Seconds between token replenishments for general endpoints.
    pub general_per_second: u64,

    /// Maximum token accumulation for general endpoints.
    pub general_burst_size: u32,

    /// Seconds between token replenishments for auth endpoints.
    pub auth_per_second: u64,

    /// Maximum token accumulation for auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 2,
            general_burst_size: 100,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to [`Default`] values for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: flag_or("RATE_LIMIT_ENABLED", defaults.enabled),
            general_per_second: parse_or(
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: parse_or(
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            auth_per_second: parse_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: parse_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// A configuration with limiting switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Governor config for general API endpoints.
    ///
    /// Returns `None` when the configured values are rejected by Governor
    /// (a zero rate or burst size).
    #[must_use]
    pub fn general_governor_config(&self) -> Option<IpGovernorConfig> {
        build(self.general_per_second, self.general_burst_size)
    }

    /// Governor config for authentication endpoints.
    #[must_use]
    pub fn auth_governor_config(&self) -> Option<IpGovernorConfig> {
        build(self.auth_per_second, self.auth_burst_size)
    }
}

fn build(per_second: u64, burst_size: u32) -> Option<IpGovernorConfig> {
    GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
}

//! # Norma Config
//!
//! Configuration types for the Norma AI API, loaded from environment
//! variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: Allowed CORS origins
//! - [`rate_limit`]: API rate limiting
//! - [`uploads`]: Document upload directory and size limit
//! - [`legal_feed`]: Legal updates feed refresh and size
//! - [`server`]: Listener addresses and environment name
//!
//! # Example
//!
//! ```ignore
//! use norma_config::{CorsConfig, JwtConfig, RateLimitConfig, UploadConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let upload_config = UploadConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod legal_feed;
pub mod rate_limit;
pub mod server;
pub mod uploads;

mod env;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use legal_feed::LegalFeedConfig;
pub use rate_limit::{IpGovernorConfig, RateLimitConfig};
pub use server::ServerConfig;
pub use uploads::UploadConfig;

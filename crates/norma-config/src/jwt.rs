use std::env;

use crate::env::parse_or;

pub const DEFAULT_JWT_SECRET: &str = "dev-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET_KEY").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            access_token_expiry: parse_or("JWT_ACCESS_EXPIRY", 3600), // 1 hour
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_expiry: 3600,
        }
    }
}

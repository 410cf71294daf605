//! # Norma Auth
//!
//! Access token utilities for the Norma AI API.
//!
//! - [`claims`]: JWT claim structure
//! - [`jwt`]: Token creation and verification
//! - [`blocklist`]: Revocation of logged-out tokens
//!
//! # Example
//!
//! ```ignore
//! use norma_auth::{TokenBlocklist, create_access_token, verify_token};
//! use norma_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "user@example.com", "user", &config)?;
//!
//! let claims = verify_token(&token, &config)?;
//! blocklist.revoke(claims.jti.clone(), claims.exp);
//! ```

pub mod blocklist;
pub mod claims;
pub mod jwt;

pub use blocklist::TokenBlocklist;
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};

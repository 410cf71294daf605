//! Middleware and extractors for authentication and authorization.
//!
//! - [`auth`]: `AuthUser` extractor (bearer token, signature, expiry, revocation)
//! - [`role`]: `require_admin` route layer backed by the stored role
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(auth_user: AuthUser) -> Result<impl IntoResponse, AppError> {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
pub mod security_headers;

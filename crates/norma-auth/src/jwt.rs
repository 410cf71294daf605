//! Access token creation and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Each token gets
//! a random `jti` so a single token can be revoked on logout.
//!
//! # Example
//!
//! ```ignore
//! use norma_auth::{create_access_token, verify_token};
//! use norma_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "user@example.com", "user", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.sub, "42");
//! ```

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use norma_config::JwtConfig;
use norma_core::AppError;

use crate::claims::Claims;

/// Creates a signed access token for a user.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: i64,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(1) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        jti: Uuid::new_v4().to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

/// Verifies signature and expiry and returns the claims.
///
/// Expiry is checked without leeway so a token stops working at the same
/// instant the blocklist forgets its `jti`.
///
/// # Errors
///
/// Returns 401 `Token has expired` for expired tokens and
/// 401 `Invalid token` for anything else.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
        _ => AppError::unauthorized("Invalid token"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify_roundtrip() {
        let config = get_test_jwt_config();
        let token = create_access_token(42, "user@example.com", "admin", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let config = get_test_jwt_config();
        let a = verify_token(&create_access_token(1, "a@b.c", "user", &config).unwrap(), &config)
            .unwrap();
        let b = verify_token(&create_access_token(1, "a@b.c", "user", &config).unwrap(), &config)
            .unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_verify_token_invalid() {
        let err = verify_token("not.a.token", &get_test_jwt_config()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "Invalid token");
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let token = create_access_token(1, "a@b.c", "user", &get_test_jwt_config()).unwrap();
        let other = JwtConfig {
            secret: "other-secret".to_string(),
            access_token_expiry: 3600,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            email: "a@b.c".to_string(),
            role: "user".to_string(),
            jti: "expired".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.error.to_string(), "Token has expired");
    }

    #[test]
    fn test_recently_expired_token_is_rejected() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "1".to_string(),
            email: "a@b.c".to_string(),
            role: "user".to_string(),
            jti: "just-expired".to_string(),
            exp: now - 5,
            iat: now - 3605,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let blocklist = crate::TokenBlocklist::new();
        blocklist.revoke(&claims.jti, claims.exp);
        assert!(!blocklist.is_revoked(&claims.jti));

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.error.to_string(), "Token has expired");
    }
}

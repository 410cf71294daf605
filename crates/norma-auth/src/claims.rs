//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// - `sub`: User ID (subject)
/// - `email`: User's email address at issue time
/// - `role`: `user` or `admin` at issue time
/// - `jti`: Unique token identifier, used for logout revocation
/// - `exp` / `iat`: Expiry and issued-at Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Unique token identifier (JWT ID)
    pub jti: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Numeric user ID carried in `sub`.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            sub: "42".to_string(),
            email: "test@example.com".to_string(),
            role: "user".to_string(),
            jti: "jti-123".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&sample()).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""role":"user""#));
        assert!(serialized.contains(r#""jti":"jti-123""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"7","email":"user@test.com","role":"admin","jti":"abc","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert!(claims.is_admin());
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            ..sample()
        };
        assert_eq!(claims.user_id(), None);
        assert!(!claims.is_admin());
    }
}

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use norma_auth::{Claims, verify_token};
use norma_core::AppError;

use crate::state::AppState;

/// Extractor that validates the bearer token and provides its claims.
///
/// Tokens revoked through logout are rejected even before they expire.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0
            .user_id()
            .ok_or_else(|| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn jti(&self) -> &str {
        &self.0.jti
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::unauthorized("Missing authorization header")
                    } else {
                        AppError::unauthorized("Invalid authorization header format")
                    }
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        if state.blocklist.is_revoked(&claims.jti) {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        Ok(AuthUser(claims))
    }
}

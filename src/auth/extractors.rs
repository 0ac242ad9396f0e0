use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{auth::jwt::JwtKeys, errors::AuthError, state::AppState};

/// Verified identity attached to a request once its bearer token checks out.
#[derive(Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::Unauthorized)?;

        // Expect "Bearer <token>"
        let token = auth.strip_prefix("Bearer ").ok_or(AuthError::Unauthorized)?;

        // Every verification failure surfaces as the same 401; the cause only
        // goes to the log.
        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AuthError::Unauthorized
        })?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::Unauthorized)?;
        Ok(AuthUser {
            id,
            email: claims.email,
        })
    }
}

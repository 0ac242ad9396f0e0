use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MeResponse, ProfileResponse, ProfileUpdateRequest,
            RegisterRequest, RegisterResponse,
        },
        extractors::AuthUser,
    },
    errors::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/me", get(me))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    let out = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    Ok(Json(state.auth.login(payload).await?))
}

#[instrument(skip(state, user))]
async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AuthError> {
    Ok(Json(state.auth.get_profile(user.id).await?))
}

#[instrument(skip(state, user, payload))]
async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, AuthError> {
    Ok(Json(state.auth.update_profile(user.id, payload).await?))
}

#[instrument(skip(state, user))]
async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MeResponse>, AuthError> {
    Ok(Json(state.auth.me(user.id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_serialization() {
        let response = LoginResponse {
            access_token: "abc.def.ghi".into(),
            token_type: "Bearer".into(),
            expires_in: 900,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["expires_in"], 900);
        assert_eq!(json["access_token"], "abc.def.ghi");
    }

    #[test]
    fn profile_update_request_fields_are_optional() {
        let req: ProfileUpdateRequest = serde_json::from_str(r#"{"phone":"5551234567"}"#).unwrap();
        assert!(req.first_name.is_none());
        assert!(req.last_name.is_none());
        assert_eq!(req.phone.as_deref(), Some("5551234567"));
    }
}

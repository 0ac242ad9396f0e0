use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::dto::{
    LoginRequest, LoginResponse, MeResponse, ProfileResponse, ProfileUpdateRequest,
    RegisterRequest, RegisterResponse,
};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::UserStore;
use crate::errors::AuthError;

/// Login tokens are stateless and unrevocable, so they stay short-lived.
/// Fixed, not a config knob.
const ACCESS_TTL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

const MIN_PASSWORD_LEN: usize = 8;
const MAX_NAME_LEN: usize = 100;
const PHONE_DIGITS: usize = 10;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Orchestrates validation, hashing, token issuance and the user store.
/// The store is injected at construction; there is no global handle.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AuthError> {
        let email = req.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            warn!(email = %email, "register rejected: invalid email");
            return Err(AuthError::InvalidEmail);
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            warn!("register rejected: password too short");
            return Err(AuthError::PasswordTooShort);
        }
        // Best-effort pre-check. The UNIQUE constraint on email is what
        // actually guarantees uniqueness under concurrent registration;
        // create() surfaces its rejection as EmailExists too.
        if self.store.count_by_email(&email).await? > 0 {
            return Err(AuthError::EmailExists);
        }
        let hash = hash_password(&req.password)?;
        let user = self.store.create(&email, &hash).await?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(RegisterResponse {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = req.email.trim().to_lowercase();
        // One error for every failure mode so callers cannot probe which
        // accounts exist.
        if email.is_empty() || req.password.is_empty() {
            return Err(AuthError::InvalidCredential);
        }
        let user = match self.store.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                return Err(AuthError::InvalidCredential);
            }
        };
        if !verify_password(&user.password_hash, &req.password) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredential);
        }

        // Best effort: a failed timestamp write must not fail the login.
        if let Err(e) = self
            .store
            .touch_last_login(user.id, OffsetDateTime::now_utc())
            .await
        {
            warn!(error = %e, user_id = %user.id, "failed to record last login");
        }

        let access_token = self.keys.sign(user.id, &user.email, ACCESS_TTL)?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".into(),
            expires_in: ACCESS_TTL.as_secs(),
        })
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<ProfileResponse, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        Ok(ProfileResponse::from(user))
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        req: ProfileUpdateRequest,
    ) -> Result<ProfileResponse, AuthError> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if let Some(first) = req.first_name {
            let first = first.trim().to_string();
            if first.is_empty() || first.len() > MAX_NAME_LEN {
                return Err(AuthError::InvalidName);
            }
            user.first_name = Some(first);
        }
        if let Some(last) = req.last_name {
            let last = last.trim().to_string();
            if last.is_empty() || last.len() > MAX_NAME_LEN {
                return Err(AuthError::InvalidName);
            }
            user.last_name = Some(last);
        }
        if let Some(phone) = req.phone {
            let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() != PHONE_DIGITS {
                return Err(AuthError::InvalidPhone);
            }
            user.phone = Some(digits);
        }

        user.updated_at = OffsetDateTime::now_utc();
        self.store.save_profile(&user).await?;
        self.get_profile(user_id).await
    }

    pub async fn me(&self, user_id: i64) -> Result<MeResponse, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        Ok(MeResponse {
            id: user.id,
            email: user.email,
            last_login_at: user.last_login_at,
        })
    }
}

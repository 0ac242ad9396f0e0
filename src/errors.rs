use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Everything the auth core can fail with. HTTP mapping lives in the
/// [`IntoResponse`] impl; authentication sub-cases deliberately collapse to a
/// single outward 401 so callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    PasswordTooShort,
    #[error("invalid name")]
    InvalidName,
    #[error("invalid phone")]
    InvalidPhone,
    #[error("email already registered")]
    EmailExists,
    #[error("invalid credentials")]
    InvalidCredential,
    #[error("unauthorized")]
    Unauthorized,
    #[error("malformed token")]
    MalformedToken,
    #[error("unexpected signing algorithm")]
    UnexpectedSigningAlgorithm,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("empty password")]
    EmptyPassword,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::InvalidName
            | AuthError::InvalidPhone => StatusCode::BAD_REQUEST,
            AuthError::EmailExists => StatusCode::CONFLICT,
            AuthError::InvalidCredential
            | AuthError::Unauthorized
            | AuthError::MalformedToken
            | AuthError::UnexpectedSigningAlgorithm
            | AuthError::InvalidSignature
            | AuthError::Expired => StatusCode::UNAUTHORIZED,
            // Profile lookups happen after the gate, so a missing user means
            // inconsistent data, not caller error.
            AuthError::EmptyPassword | AuthError::NotFound | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail => "INVALID_EMAIL",
            AuthError::PasswordTooShort => "PASSWORD_TOO_SHORT",
            AuthError::InvalidName => "INVALID_NAME",
            AuthError::InvalidPhone => "INVALID_PHONE",
            AuthError::EmailExists => "EMAIL_EXISTS",
            AuthError::InvalidCredential => "INVALID_CREDENTIALS",
            AuthError::Unauthorized
            | AuthError::MalformedToken
            | AuthError::UnexpectedSigningAlgorithm
            | AuthError::InvalidSignature
            | AuthError::Expired => "UNAUTHORIZED",
            AuthError::EmptyPassword | AuthError::NotFound | AuthError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidEmail => "invalid email",
            AuthError::PasswordTooShort => "password too short",
            AuthError::InvalidName => "invalid name",
            AuthError::InvalidPhone => "invalid phone",
            AuthError::EmailExists => "email already registered",
            AuthError::InvalidCredential => "invalid credentials",
            AuthError::Unauthorized
            | AuthError::MalformedToken
            | AuthError::UnexpectedSigningAlgorithm
            | AuthError::InvalidSignature
            | AuthError::Expired => "invalid token",
            AuthError::EmptyPassword | AuthError::NotFound | AuthError::Internal(_) => {
                "internal error"
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Detail stays in the log, never in the response body.
            error!(error = %self, "internal error");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.public_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        for err in [
            AuthError::InvalidEmail,
            AuthError::PasswordTooShort,
            AuthError::InvalidName,
            AuthError::InvalidPhone,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn email_conflict_maps_to_409() {
        assert_eq!(AuthError::EmailExists.status(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailExists.code(), "EMAIL_EXISTS");
    }

    #[test]
    fn token_failures_collapse_to_one_outward_error() {
        for err in [
            AuthError::Unauthorized,
            AuthError::MalformedToken,
            AuthError::UnexpectedSigningAlgorithm,
            AuthError::InvalidSignature,
            AuthError::Expired,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.code(), "UNAUTHORIZED");
            assert_eq!(err.public_message(), "invalid token");
        }
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = AuthError::Internal(anyhow::anyhow!("connection refused to 10.0.0.3"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal error");
        assert_eq!(AuthError::NotFound.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_shape() {
        let body = ErrorResponse {
            error: ErrorBody {
                code: "INVALID_EMAIL",
                message: "invalid email",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_EMAIL");
        assert_eq!(json["error"]["message"], "invalid email");
    }
}

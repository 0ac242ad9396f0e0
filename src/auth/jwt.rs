use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::Claims, config::JwtConfig, errors::AuthError, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
        }
    }

    pub fn sign(&self, user_id: i64, email: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.into()))?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Only HS256 is accepted; a token declaring any other scheme is rejected
    /// before its signature is even checked.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    AuthError::UnexpectedSigningAlgorithm
                }
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
        })
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign(42, "user@example.com", Duration::from_secs(900))
            .expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: "7".into(),
            email: "late@example.com".into(),
            iss: "test-issuer".into(),
            iat: (now - 120) as usize,
            exp: (now - 60) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn wrong_key_fails_signature() {
        let signer = make_keys("key-one");
        let verifier = make_keys("key-two");
        let token = signer
            .sign(1, "a@example.com", Duration::from_secs(600))
            .expect("sign");
        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = make_keys("dev-secret");
        let err = keys.verify("not-a-token").unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));
    }

    #[test]
    fn non_hs256_algorithm_is_rejected() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: "9".into(),
            email: "alg@example.com".into(),
            iss: "test-issuer".into(),
            iat: now as usize,
            exp: (now + 600) as usize,
        };
        // Same secret, different declared algorithm: algorithm confusion.
        let token = encode(&Header::new(Algorithm::HS384), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::UnexpectedSigningAlgorithm));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let signer = JwtKeys::new(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "someone-else".into(),
        });
        let verifier = make_keys("dev-secret");
        let token = signer
            .sign(3, "iss@example.com", Duration::from_secs(600))
            .expect("sign");
        assert!(verifier.verify(&token).is_err());
    }
}

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::errors::AuthError;

pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    if plain.is_empty() {
        return Err(AuthError::EmptyPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AuthError::Internal(anyhow::anyhow!(e.to_string()))
        })?
        .to_string();
    Ok(hash)
}

/// Empty inputs and unparseable hashes verify as false instead of erroring.
/// The underlying comparison is constant-time in the plaintext.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    if hash.is_empty() || plain.is_empty() {
        return false;
    }
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(&hash, password));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password(&hash, "wrong-password"));
    }

    #[test]
    fn hash_rejects_empty_password() {
        let err = hash_password("").unwrap_err();
        assert!(matches!(err, AuthError::EmptyPassword));
    }

    #[test]
    fn verify_is_false_for_empty_inputs() {
        let hash = hash_password("whatever1").unwrap();
        assert!(!verify_password(&hash, ""));
        assert!(!verify_password("", "whatever1"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn verify_is_false_for_malformed_hash() {
        assert!(!verify_password("not-a-valid-hash", "anything"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}

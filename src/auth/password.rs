// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing for stored principals.
//!
//! Argon2id with a random salt per password, stored as a PHC string.
//! Plaintext passwords are never stored, logged or returned.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::sync::LazyLock;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashFailed(String),
}

/// Hash a password with Argon2id.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashFailed(e.to_string()))
}

/// Check a password against a stored PHC hash.
///
/// An unparsable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

const UNKNOWN_USER_PASSWORD: &str = "no-such-user-placeholder";

/// Real Argon2id hash checked when the username is unknown, so a login for a
/// missing user costs the same as a wrong password.
static UNKNOWN_USER_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password(UNKNOWN_USER_PASSWORD).unwrap_or_default());

/// Check a login attempt against the stored hash, if the user exists.
///
/// Always performs one Argon2 verification. Returns `false` when
/// `stored_hash` is `None`, whatever the password.
pub fn verify_login(password: &str, stored_hash: Option<&str>) -> bool {
    let (hash, known_user) = match stored_hash {
        Some(hash) => (hash, true),
        None => (UNKNOWN_USER_HASH.as_str(), false),
    };
    verify_password(password, hash) && known_user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_phc_string() {
        let hash = hash_password("s3cretpass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("s3cretpass"));
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(
            hash_password("s3cretpass").unwrap(),
            hash_password("s3cretpass").unwrap()
        );
    }

    #[test]
    fn verify_accepts_only_the_hashed_password() {
        let hash = hash_password("s3cretpass").unwrap();
        assert!(verify_password("s3cretpass", &hash));
        assert!(!verify_password("s3cretpasS", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn unknown_user_is_checked_against_a_real_hash() {
        assert!(UNKNOWN_USER_HASH.starts_with("$argon2id$"));
        assert!(verify_password(UNKNOWN_USER_PASSWORD, &UNKNOWN_USER_HASH));
    }

    #[test]
    fn verify_login_never_accepts_unknown_user() {
        assert!(!verify_login(UNKNOWN_USER_PASSWORD, None));
        assert!(!verify_login("s3cretpass", None));

        let hash = hash_password("s3cretpass").unwrap();
        assert!(verify_login("s3cretpass", Some(&hash)));
        assert!(!verify_login("wrongpass", Some(&hash)));
    }
}

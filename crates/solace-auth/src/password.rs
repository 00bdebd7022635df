// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (algorithm, parameters, and salt are
//! self-describing), so verification needs nothing beyond the stored hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use solace_core::{AuthError, SolaceError};

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, SolaceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SolaceError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// A stored hash that fails to parse is treated as invalid credentials
/// rather than an internal error, so login failures stay uniform.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn wrong_password_rejected() {
        let hash = hash_password("right").unwrap();
        assert_eq!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash.
        let h1 = hash_password("pw").unwrap();
        let h2 = hash_password("pw").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn unparseable_stored_hash_is_invalid_credentials() {
        assert_eq!(
            verify_password("pw", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        );
    }
}

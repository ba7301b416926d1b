//! Argon2id password hashing for the configured admin account.

use argon2::Argon2;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use thiserror::Error;

/// Password hashing failures.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Refused to hash an empty password.
    #[error("password must not be empty")]
    Empty,

    /// The stored value is not a PHC hash string.
    #[error("admin password hash is not a valid PHC string")]
    MalformedHash,

    /// Argon2 itself failed.
    #[error("argon2 failure: {0}")]
    Argon2(String),
}

/// Hashes a password into the PHC string stored in `admin.password_hash`.
///
/// # Example
///
/// ```
/// use regdesk_core::auth::hash_password;
///
/// let hash = hash_password("admin-password").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Argon2(e.to_string()))
}

/// Checks `password` against a PHC hash. A wrong password is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(PasswordError::Argon2(e.to_string())),
    }
}

/// Returns true when `hash` parses as a PHC string.
#[must_use]
pub fn is_valid_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}

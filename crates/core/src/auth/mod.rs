//! Admin authentication.
//!
//! A single admin account is configured with a username and an Argon2id
//! password hash. There is no user table.

mod password;

pub use password::{PasswordError, hash_password, is_valid_hash, verify_password};

use regdesk_shared::AppError;
use thiserror::Error;

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password was not supplied.
    #[error("username and password are required")]
    MissingCredentials,

    /// Username or password did not match.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The configured hash could not be used.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::Validation(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Password(e) => Self::Internal(e.to_string()),
        }
    }
}

/// Configured admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[hidden]")
            .finish()
    }
}

impl AdminCredentials {
    /// Creates credentials from configuration.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Configured admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Checks a login attempt.
    ///
    /// The password hash is verified even when the username is wrong so
    /// both failures take similar time.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` for blank input, `InvalidCredentials` on
    /// mismatch, or `Password` when the configured hash is malformed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let password_ok = verify_password(password, &self.password_hash)?;
        if username == self.username && password_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AdminCredentials {
        AdminCredentials::new("admin", hash_password("correct horse").unwrap())
    }

    #[test]
    fn test_authenticate_success() {
        assert!(credentials().authenticate("admin", "correct horse").is_ok());
        assert!(credentials().authenticate("  admin ", "correct horse").is_ok());
    }

    #[test]
    fn test_authenticate_failures() {
        let creds = credentials();
        assert!(matches!(
            creds.authenticate("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.authenticate("root", "correct horse"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            creds.authenticate("", "x"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            creds.authenticate("admin", ""),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_malformed_hash_is_server_error() {
        let creds = AdminCredentials::new("admin", "plaintext");
        let err = creds.authenticate("admin", "x").unwrap_err();
        let app: AppError = err.into();
        assert!(app.is_server_error());
    }

    #[test]
    fn test_debug_hides_hash() {
        let debug = format!("{:?}", credentials());
        assert!(!debug.contains("argon2"));
    }
}

//! Authentication types for admin tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role carried by every admin token.
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims for admin tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin username).
    pub sub: String,
    /// Role of the subject.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new admin claims.
    #[must_use]
    pub fn new(username: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the username from claims.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Returns true if the claims grant admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Login request payload.
///
/// Fields default to empty so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    #[serde(default)]
    pub username: String,
    /// Admin password.
    #[serde(default)]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Admin token.
    pub token: String,
    /// Token type, always `Bearer`.
    pub token_type: &'static str,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn claims_sets_expiration_and_iat() {
        let expires_at = Utc::now() + Duration::minutes(30);
        let before = Utc::now().timestamp();
        let claims = Claims::new("admin", expires_at);
        let after = Utc::now().timestamp();

        assert_eq!(claims.username(), "admin");
        assert!(claims.is_admin());
        assert!(claims.iat >= before);
        assert!(claims.iat <= after);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn login_request_missing_fields_default_to_empty() {
        let request: LoginRequest = serde_json::from_str(r#"{"username":"admin"}"#).unwrap();
        assert_eq!(request.username, "admin");
        assert!(request.password.is_empty());
    }
}

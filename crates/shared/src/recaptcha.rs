//! reCAPTCHA token verification.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::RecaptchaConfig;

/// reCAPTCHA verification errors.
#[derive(Debug, Error)]
pub enum RecaptchaError {
    /// The verification request failed.
    #[error("reCAPTCHA request failed: {0}")]
    Request(String),
    /// The verification response could not be parsed.
    #[error("reCAPTCHA response invalid: {0}")]
    Response(String),
}

/// Response body of the `siteverify` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// Whether the token is valid.
    pub success: bool,
    /// Score for v3 tokens.
    #[serde(default)]
    pub score: Option<f64>,
    /// Action name for v3 tokens.
    #[serde(default)]
    pub action: Option<String>,
    /// Error codes, if any.
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Verifies reCAPTCHA tokens against Google's `siteverify` endpoint.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    config: RecaptchaConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for RecaptchaVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecaptchaVerifier")
            .field("enabled", &self.is_enabled())
            .field("verify_url", &self.config.verify_url)
            .finish_non_exhaustive()
    }
}

impl RecaptchaVerifier {
    /// Creates a new verifier whose requests give up after
    /// `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns `RecaptchaError::Request` if the HTTP client cannot be built.
    pub fn new(config: RecaptchaConfig) -> Result<Self, RecaptchaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecaptchaError::Request(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Returns true when a secret is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config
            .secret_key
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Verifies a token.
    ///
    /// Returns `Ok(true)` without a network call when verification is
    /// disabled, and `Ok(false)` without a network call when the token is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the verification endpoint cannot be reached or
    /// answers with an unexpected body.
    pub async fn verify(
        &self,
        token: Option<&str>,
        remote_ip: Option<&str>,
    ) -> Result<bool, RecaptchaError> {
        let Some(secret) = self.config.secret_key.as_deref().filter(|s| !s.is_empty()) else {
            debug!("reCAPTCHA secret not configured, skipping verification");
            return Ok(true);
        };

        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        let mut form = vec![("secret", secret), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .client
            .post(&self.config.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| RecaptchaError::Request(e.to_string()))?
            .json::<VerifyResponse>()
            .await
            .map_err(|e| RecaptchaError::Response(e.to_string()))?;

        debug!(
            success = response.success,
            score = ?response.score,
            errors = ?response.error_codes,
            "reCAPTCHA verification result"
        );

        Ok(self.accepts(&response))
    }

    /// Decides whether a verification response passes.
    #[must_use]
    pub fn accepts(&self, response: &VerifyResponse) -> bool {
        response.success
            && response
                .score
                .is_none_or(|score| score >= self.config.min_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> RecaptchaVerifier {
        RecaptchaVerifier::new(RecaptchaConfig {
            secret_key: Some("secret".to_string()),
            ..RecaptchaConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_verifier_accepts() {
        let verifier = RecaptchaVerifier::new(RecaptchaConfig::default()).unwrap();
        assert!(!verifier.is_enabled());
        assert!(verifier.verify(None, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_token_rejected_without_request() {
        let verifier = enabled();
        assert!(!verifier.verify(None, None).await.unwrap());
        assert!(!verifier.verify(Some("   "), None).await.unwrap());
    }

    #[test]
    fn test_accepts_checks_score() {
        let verifier = enabled();
        let parse = |json: &str| serde_json::from_str::<VerifyResponse>(json).unwrap();

        assert!(verifier.accepts(&parse(r#"{"success":true}"#)));
        assert!(verifier.accepts(&parse(r#"{"success":true,"score":0.9}"#)));
        assert!(!verifier.accepts(&parse(r#"{"success":true,"score":0.1}"#)));
        assert!(!verifier.accepts(&parse(
            r#"{"success":false,"error-codes":["invalid-input-response"]}"#
        )));
    }

    #[tokio::test]
    async fn test_unresponsive_endpoint_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let verifier = RecaptchaVerifier::new(RecaptchaConfig {
            secret_key: Some("secret".to_string()),
            verify_url: format!("http://{addr}/siteverify"),
            timeout_secs: 1,
            ..RecaptchaConfig::default()
        })
        .unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            verifier.verify(Some("token"), None),
        )
        .await
        .expect("verify should give up on its own");
        assert!(matches!(result, Err(RecaptchaError::Request(_))));
        server.abort();
    }
}

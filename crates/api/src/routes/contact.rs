//! Contact form route.

use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{HeaderMap, StatusCode, request::Parts},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use regdesk_core::contact::{ContactError, ContactSubmission};

/// Creates the contact router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit))
}

/// Contact response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Always true.
    pub success: bool,
    /// Confirmation text.
    pub message: &'static str,
}

/// Peer address when the server was started with connect info.
pub struct PeerAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for PeerAddr
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

/// Client address, preferring the first `X-Forwarded-For` hop.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// POST /contact - Validate, verify reCAPTCHA, and mail the lead.
async fn submit(
    State(state): State<AppState>,
    PeerAddr(peer): PeerAddr,
    headers: HeaderMap,
    ApiJson(submission): ApiJson<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let lead = submission.validate()?;

    let remote_ip = client_ip(&headers, peer);
    let human = state
        .recaptcha
        .verify(submission.recaptcha_token.as_deref(), remote_ip.as_deref())
        .await?;
    if !human {
        warn!(email = %lead.email, "Contact form rejected by reCAPTCHA");
        return Err(ContactError::RecaptchaFailed.into());
    }

    state
        .email_service
        .send_lead_notification(&lead.reply_to(), &lead.subject(), &lead.body())
        .await?;

    info!(service = ?lead.service, "Contact lead received");
    Ok((
        StatusCode::OK,
        Json(ContactResponse {
            success: true,
            message: "Thank you. We will get back to you shortly.",
        }),
    ))
}

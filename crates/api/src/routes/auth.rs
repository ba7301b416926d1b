//! Admin login and session routes.

use axum::{Json, Router, extract::State, routing::{get, post}};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::middleware::auth::AdminUser;
use regdesk_core::auth::AuthError;
use regdesk_shared::auth::{LoginRequest, LoginResponse};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Admin-only auth routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/session", get(session))
}

/// POST /auth/login - Check the admin credentials and issue a token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AuthError::MissingCredentials.into());
    }

    // Argon2 verification is CPU-bound.
    let admin = state.admin.clone();
    let LoginRequest { username, password } = payload;
    let attempted = username.trim().to_string();
    let outcome = tokio::task::spawn_blocking(move || admin.authenticate(&username, &password))
        .await
        .map_err(|e| regdesk_shared::AppError::Internal(e.to_string()))?;

    if let Err(e) = outcome {
        if matches!(e, AuthError::InvalidCredentials) {
            warn!(username = %attempted, "Failed admin login attempt");
        }
        return Err(e.into());
    }

    let token = state.jwt_service.generate_admin_token(&attempted)?;
    info!(username = %attempted, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt_service.token_expires_in(),
    }))
}

/// Current admin session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Admin username.
    pub username: String,
    /// Role.
    pub role: String,
    /// Token expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// GET /admin/session - Echo the token's subject and expiry.
async fn session(admin: AdminUser) -> Json<SessionResponse> {
    let claims = admin.claims();
    Json(SessionResponse {
        username: admin.username().to_string(),
        role: claims.role.clone(),
        expires_at: DateTime::from_timestamp(claims.exp, 0),
    })
}

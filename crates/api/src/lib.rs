//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Admin authentication middleware
//! - Request extractors and the error response body

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use regdesk_core::auth::AdminCredentials;
use regdesk_core::blog::BlogService;
use regdesk_core::storage::{ImageStorage, StorageBackend};
use regdesk_db::BlogRepository;
use regdesk_shared::{ChatClient, EmailService, JwtService, RecaptchaVerifier};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Blog service over the Postgres repository.
    pub blog: BlogService<BlogRepository>,
    /// JWT service for admin tokens.
    pub jwt_service: Arc<JwtService>,
    /// Configured admin account.
    pub admin: Arc<AdminCredentials>,
    /// Email service for lead notifications.
    pub email_service: Arc<EmailService>,
    /// reCAPTCHA verifier for the contact form.
    pub recaptcha: Arc<RecaptchaVerifier>,
    /// Image storage (optional).
    pub storage: Option<Arc<ImageStorage>>,
    /// Chat-completion client.
    pub chat: Arc<ChatClient>,
}

impl AppState {
    /// Builds state around a database connection.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabaseConnection,
        jwt_service: JwtService,
        admin: AdminCredentials,
        email_service: EmailService,
        recaptcha: RecaptchaVerifier,
        storage: Option<ImageStorage>,
        chat: ChatClient,
    ) -> Self {
        let blog = BlogService::new(Arc::new(BlogRepository::new(db.clone())));
        Self {
            db: Arc::new(db),
            blog,
            jwt_service: Arc::new(jwt_service),
            admin: Arc::new(admin),
            email_service: Arc::new(email_service),
            recaptcha: Arc::new(recaptcha),
            storage: storage.map(Arc::new),
            chat: Arc::new(chat),
        }
    }
}

/// Builds the CORS layer. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

/// Creates the main application router.
///
/// Images in a local storage directory are served under `/uploads`.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    let mut router = Router::new().nest("/api/v1", routes::api_routes_with_state(state.clone()));

    if let Some(StorageBackend::Local { root }) =
        state.storage.as_ref().map(|s| &s.config().backend)
    {
        router = router.nest_service("/uploads", ServeDir::new(root));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

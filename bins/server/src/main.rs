//! RegDesk API Server
//!
//! Main entry point for the RegDesk backend service.

use std::net::SocketAddr;

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regdesk_api::{AppState, cors_layer, create_router};
use regdesk_core::auth::{AdminCredentials, is_valid_hash};
use regdesk_core::storage::ImageStorage;
use regdesk_db::{connect_with, migration::Migrator};
use regdesk_shared::{
    AppConfig, ChatClient, EmailService, JwtConfig, JwtService, RecaptchaVerifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    if config.database.auto_migrate {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));
    if !is_valid_hash(&config.admin.password_hash) {
        warn!("admin.password_hash is not an Argon2 PHC string, admin login will fail");
    }
    let admin = AdminCredentials::new(
        config.admin.username.clone(),
        config.admin.password_hash.clone(),
    );

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let recaptcha = RecaptchaVerifier::new(config.recaptcha.clone())?;
    if !recaptcha.is_enabled() {
        warn!("reCAPTCHA secret not set, contact form submissions are not verified");
    }

    let storage = config
        .storage
        .clone()
        .map(|settings| ImageStorage::from_config(settings.into()))
        .transpose()?;
    match &storage {
        Some(s) => info!(provider = s.config().backend.name(), "Image storage configured"),
        None => warn!("Image storage not configured, uploads are disabled"),
    }

    let chat = ChatClient::new(config.chat.clone())?;
    if !chat.is_enabled() {
        warn!("Chat API key not set, chat endpoint is disabled");
    }

    let state = AppState::new(
        db,
        jwt_service,
        admin,
        email_service,
        recaptcha,
        storage,
        chat,
    );

    // Create router
    let app = create_router(state, cors_layer(&config.server.cors_origins));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

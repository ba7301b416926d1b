//! Shared types, errors, and configuration for RegDesk.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - Pagination types for list endpoints
//! - Admin token issuing and validation
//! - Clients for the external services the site talks to (SMTP, reCAPTCHA,
//!   chat completions)

pub mod auth;
pub mod chat;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod recaptcha;
pub mod types;

pub use auth::Claims;
pub use chat::{ChatClient, ChatError, ChatTurn};
pub use config::{AppConfig, ChatConfig, EmailConfig, RecaptchaConfig, StorageSettings};
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use recaptcha::{RecaptchaError, RecaptchaVerifier};

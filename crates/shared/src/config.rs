//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Admin credentials.
    pub admin: AdminConfig,
    /// Outgoing email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// reCAPTCHA verification.
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
    /// Object storage for uploaded images. Uploads are disabled when absent.
    #[serde(default)]
    pub storage: Option<StorageSettings>,
    /// Chat-completion proxy.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Run pending migrations when the server starts.
    #[serde(default)]
    pub auto_migrate: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Admin token expiration in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    28_800 // 8 hours
}

/// Admin login configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin username.
    pub username: String,
    /// Argon2id PHC hash of the admin password.
    pub password_hash: String,
}

/// SMTP configuration for outgoing mail.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Inbox that receives contact-form leads.
    #[serde(default = "default_notify_email")]
    pub notify_email: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@regdesk.local".to_string()
}

fn default_from_name() -> String {
    "RegDesk".to_string()
}

fn default_notify_email() -> String {
    "leads@regdesk.local".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            notify_email: default_notify_email(),
        }
    }
}

/// reCAPTCHA verification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaConfig {
    /// Server-side secret. Verification is skipped when unset.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Verification endpoint.
    #[serde(default = "default_recaptcha_url")]
    pub verify_url: String,
    /// Minimum acceptable score for v3 tokens.
    #[serde(default = "default_recaptcha_min_score")]
    pub min_score: f64,
    /// Request timeout in seconds.
    #[serde(default = "default_recaptcha_timeout")]
    pub timeout_secs: u64,
}

fn default_recaptcha_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_recaptcha_min_score() -> f64 {
    0.5
}

fn default_recaptcha_timeout() -> u64 {
    10
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            verify_url: default_recaptcha_url(),
            min_score: default_recaptcha_min_score(),
            timeout_secs: default_recaptcha_timeout(),
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum StorageSettings {
    /// S3-compatible bucket.
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        #[serde(default = "default_region")]
        region: String,
        /// Base URL under which stored objects are publicly served.
        public_base_url: String,
        /// Maximum upload size in bytes.
        #[serde(default)]
        max_file_size: Option<u64>,
    },
    /// Local directory (development).
    Local {
        /// Root directory.
        root: String,
        /// Base URL under which stored objects are publicly served.
        public_base_url: String,
        /// Maximum upload size in bytes.
        #[serde(default)]
        max_file_size: Option<u64>,
    },
}

fn default_region() -> String {
    "auto".to_string()
}

/// Chat-completion proxy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// API key. The chat endpoint answers 503 when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Maximum tokens in a reply.
    #[serde(default = "default_chat_max_tokens")]
    pub max_tokens: u32,
    /// System prompt prepended to every conversation.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Request timeout in seconds.
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_chat_max_tokens() -> u32 {
    500
}

fn default_chat_timeout() -> u64 {
    30
}

fn default_system_prompt() -> String {
    "You are a helpful assistant for a business registration and compliance firm. \
     Answer questions about company registration, GST, tax filing, and related services \
     concisely, and suggest contacting the team for case-specific advice."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_chat_base_url(),
            model: default_chat_model(),
            max_tokens: default_chat_max_tokens(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("REGDESK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("REGDESK__SERVER__PORT", Some("9090")),
                ("REGDESK__DATABASE__URL", Some("postgres://localhost/regdesk")),
                ("REGDESK__JWT__SECRET", Some("env-secret")),
                ("REGDESK__ADMIN__USERNAME", Some("admin")),
                ("REGDESK__ADMIN__PASSWORD_HASH", Some("$argon2id$hash")),
                ("RUN_MODE", Some("config-test-nonexistent")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/regdesk");
                assert_eq!(config.database.max_connections, 10);
                assert!(!config.database.auto_migrate);
                assert_eq!(config.jwt.secret, "env-secret");
                assert_eq!(config.jwt.token_expiry_secs, 28_800);
                assert_eq!(config.admin.username, "admin");
                assert_eq!(config.email.smtp_port, 1025);
                assert!(config.recaptcha.secret_key.is_none());
                assert!(config.storage.is_none());
                assert!(config.chat.api_key.is_none());
                assert_eq!(config.recaptcha.timeout_secs, 10);
                assert_eq!(config.chat.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_missing_required_section_fails() {
        temp_env::with_vars(
            [
                ("REGDESK__DATABASE__URL", None::<&str>),
                ("REGDESK__JWT__SECRET", None),
                ("REGDESK__ADMIN__USERNAME", None),
                ("REGDESK__ADMIN__PASSWORD_HASH", None),
                ("RUN_MODE", Some("config-test-nonexistent")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_storage_settings_tagged() {
        let settings: StorageSettings = serde_json::from_str(
            r#"{"provider":"local","root":"./uploads","public_base_url":"http://localhost:8080/uploads"}"#,
        )
        .unwrap();
        assert!(matches!(settings, StorageSettings::Local { .. }));
    }

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }
}

//! HTTP error responses.
//!
//! Every failure is rendered as `{ "error": <code>, "message": <text> }`.
//! Server-side failures are logged with their detail and answered with a
//! generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use regdesk_core::auth::AuthError;
use regdesk_core::blog::BlogError;
use regdesk_core::calculators::CalculatorError;
use regdesk_core::chat::ConversationError;
use regdesk_core::contact::ContactError;
use regdesk_core::storage::StorageError;
use regdesk_shared::{AppError, ChatError, EmailError, JwtError, RecaptchaError};

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 with the generic validation code.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    /// 503 for a feature whose backing service is not configured.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", message)
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.error_code(), err.public_message())
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        AppError::from(err).into()
    }
}

impl From<CalculatorError> for ApiError {
    fn from(err: CalculatorError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        AppError::from(err).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        AppError::from(err).into()
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::RecaptchaFailed => Self::new(
                StatusCode::BAD_REQUEST,
                "recaptcha_failed",
                err.to_string(),
            ),
            ContactError::Invalid { .. } => AppError::from(err).into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            ),
            other => AppError::from(other).into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => {
                Self::new(StatusCode::UNAUTHORIZED, "token_expired", "Token has expired")
            }
            JwtError::Invalid | JwtError::DecodingError(_) => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or malformed token",
            ),
            JwtError::EncodingError(e) => AppError::Internal(e).into(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => Self::unavailable("Chat is not available"),
            other => AppError::ExternalService(other.to_string()).into(),
        }
    }
}

impl From<RecaptchaError> for ApiError {
    fn from(err: RecaptchaError) -> Self {
        AppError::ExternalService(err.to_string()).into()
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        AppError::ExternalService(err.to_string()).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

//! Blog error types.

use regdesk_shared::AppError;
use thiserror::Error;

/// Blog operation errors.
#[derive(Debug, Error)]
pub enum BlogError {
    /// Post not found by ID or slug.
    #[error("blog post not found: {0}")]
    NotFound(String),

    /// Another post already uses the slug.
    #[error("slug '{0}' is already in use")]
    DuplicateSlug(String),

    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl BlogError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound(_) => Self::NotFound("Blog post not found".to_string()),
            BlogError::DuplicateSlug(_) => Self::Conflict(err.to_string()),
            BlogError::Validation(msg) => Self::Validation(msg),
            BlogError::Repository(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = BlogError::DuplicateSlug("gst-guide".into()).into();
        assert_eq!(app.status_code(), 409);
        assert_eq!(app.public_message(), "slug 'gst-guide' is already in use");

        let app: AppError = BlogError::NotFound("x".into()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = BlogError::repository("pool timed out").into();
        assert!(app.is_server_error());
    }
}

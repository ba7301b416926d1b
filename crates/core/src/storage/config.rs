//! Storage configuration types.

use std::path::PathBuf;

use regdesk_shared::StorageSettings;

/// Default max upload size: 5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// MIME types accepted for image uploads.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Where images are written.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// S3-compatible bucket: Cloudflare R2, AWS S3, MinIO.
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
        region: String,
    },
    /// Local filesystem (development only).
    Local {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageBackend {
    /// Provider name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Local { .. } => "local",
        }
    }
}

/// Image storage configuration.
#[derive(Debug, Clone)]
pub struct ImageStorageConfig {
    /// Storage backend.
    pub backend: StorageBackend,
    /// Base URL that serves stored keys.
    pub public_base_url: String,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
}

impl ImageStorageConfig {
    /// Creates a config with the default size limit.
    #[must_use]
    pub fn new(backend: StorageBackend, public_base_url: impl Into<String>) -> Self {
        Self {
            backend,
            public_base_url: public_base_url.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Sets the maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Checks a MIME type against the image allow-list.
    #[must_use]
    pub fn is_mime_type_allowed(mime_type: &str) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&mime_type)
    }
}

impl From<StorageSettings> for ImageStorageConfig {
    fn from(settings: StorageSettings) -> Self {
        match settings {
            StorageSettings::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
                public_base_url,
                max_file_size,
            } => Self {
                backend: StorageBackend::S3 {
                    endpoint,
                    bucket,
                    access_key_id,
                    secret_access_key,
                    region,
                },
                public_base_url,
                max_file_size: max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            },
            StorageSettings::Local {
                root,
                public_base_url,
                max_file_size,
            } => Self {
                backend: StorageBackend::Local { root: root.into() },
                public_base_url,
                max_file_size: max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_local_settings() {
        let config = ImageStorageConfig::from(StorageSettings::Local {
            root: "./uploads".into(),
            public_base_url: "http://localhost:8080/uploads".into(),
            max_file_size: None,
        });
        assert_eq!(config.backend.name(), "local");
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_from_s3_settings_keeps_limit() {
        let config = ImageStorageConfig::from(StorageSettings::S3 {
            endpoint: "https://account.r2.cloudflarestorage.com".into(),
            bucket: "images".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            region: "auto".into(),
            public_base_url: "https://cdn.example.com".into(),
            max_file_size: Some(1024),
        });
        assert_eq!(config.backend.name(), "s3");
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_mime_allow_list() {
        assert!(ImageStorageConfig::is_mime_type_allowed("image/png"));
        assert!(ImageStorageConfig::is_mime_type_allowed("image/webp"));
        assert!(!ImageStorageConfig::is_mime_type_allowed("image/svg+xml"));
        assert!(!ImageStorageConfig::is_mime_type_allowed("application/pdf"));
    }
}

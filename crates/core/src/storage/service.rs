//! Image storage service implementation using Apache OpenDAL.

use chrono::{DateTime, Utc};
use opendal::{Operator, services};
use serde::Serialize;
use uuid::Uuid;

use super::config::{ImageStorageConfig, StorageBackend};
use super::error::StorageError;

const MAX_FILENAME_LENGTH: usize = 100;

/// A stored image as reported back to the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// Storage key.
    pub key: String,
    /// Public URL of the image.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub content_type: String,
}

/// Storage service for blog images.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    operator: Operator,
    config: ImageStorageConfig,
    set_content_type: bool,
}

impl ImageStorage {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: ImageStorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.backend)?;
        let set_content_type = operator.info().full_capability().write_with_content_type;
        Ok(Self {
            operator,
            config,
            set_content_type,
        })
    }

    fn create_operator(backend: &StorageBackend) -> Result<Operator, StorageError> {
        match backend {
            StorageBackend::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageBackend::Local { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against the type allow-list and size limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, too large, or not an allowed
    /// image type.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::Empty);
        }
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }
        if !ImageStorageConfig::is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }
        Ok(())
    }

    /// Validates and writes an image, returning its key and public URL.
    ///
    /// # Errors
    ///
    /// Returns a client error when validation fails, or an operation error
    /// when the backend rejects the write.
    pub async fn upload_image(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, StorageError> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        self.validate_upload(content_type, size)?;

        let key = image_key(filename, Uuid::new_v4(), Utc::now());
        let mut write = self.operator.write_with(&key, bytes);
        if self.set_content_type {
            write = write.content_type(content_type);
        }
        write.await?;

        tracing::debug!(
            key = %key,
            size,
            provider = self.config.backend.name(),
            "Image stored"
        );

        Ok(StoredImage {
            url: self.public_url(&key),
            key,
            size,
            content_type: content_type.to_string(),
        })
    }

    /// Public URL for a stored key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.config.public_base_url.trim_end_matches('/'))
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ImageStorageConfig {
        &self.config
    }
}

/// Storage key for an uploaded image: `blog/{YYYY}/{MM}/{id}-{filename}`.
#[must_use]
pub fn image_key(filename: &str, id: Uuid, now: DateTime<Utc>) -> String {
    format!(
        "blog/{}/{id}-{}",
        now.format("%Y/%m"),
        sanitize_filename(filename)
    )
}

/// Reduces a client filename to lowercase ASCII letters, digits, dots,
/// hyphens and underscores. Other runs of characters become one hyphen.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on Windows may send the full path.
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }

    let trimmed: String = out
        .trim_matches(|c| c == '-' || c == '.')
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .collect();

    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn local_storage(max: u64) -> (ImageStorage, std::path::PathBuf) {
        let root = std::env::temp_dir().join(format!("regdesk-storage-{}", Uuid::new_v4()));
        let config = ImageStorageConfig::new(
            StorageBackend::Local { root: root.clone() },
            "http://localhost:8080/uploads/",
        )
        .with_max_file_size(max);
        (ImageStorage::from_config(config).unwrap(), root)
    }

    #[rstest]
    #[case("Team Photo.PNG", "team-photo.png")]
    #[case("C:\\Users\\me\\banner.jpg", "banner.jpg")]
    #[case("../../etc/passwd", "passwd")]
    #[case("日本語.webp", "webp")]
    #[case("???", "image")]
    #[case("a  b__c.gif", "a-b__c.gif")]
    fn test_sanitize_filename(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[test]
    fn test_image_key_layout() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(
            image_key("Cover.png", id, now),
            "blog/2026/03/550e8400-e29b-41d4-a716-446655440000-cover.png"
        );
    }

    #[test]
    fn test_validate_upload() {
        let (storage, _) = local_storage(1024);
        assert!(storage.validate_upload("image/jpeg", 512).is_ok());
        assert!(matches!(
            storage.validate_upload("image/jpeg", 2048),
            Err(StorageError::FileTooLarge { size: 2048, max: 1024 })
        ));
        assert!(matches!(
            storage.validate_upload("text/html", 10),
            Err(StorageError::InvalidMimeType { .. })
        ));
        assert!(matches!(
            storage.validate_upload("image/png", 0),
            Err(StorageError::Empty)
        ));
    }

    #[test]
    fn test_public_url_joins_once() {
        let (storage, _) = local_storage(1024);
        assert_eq!(
            storage.public_url("blog/2026/01/x.png"),
            "http://localhost:8080/uploads/blog/2026/01/x.png"
        );
    }

    #[tokio::test]
    async fn test_upload_writes_under_root() {
        let (storage, root) = local_storage(1024);
        let bytes = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

        let stored = storage
            .upload_image("cover.png", "image/png", bytes.clone())
            .await
            .unwrap();

        assert!(stored.key.starts_with("blog/"));
        assert!(stored.key.ends_with("-cover.png"));
        assert_eq!(stored.size, 7);
        assert_eq!(stored.content_type, "image/png");
        assert!(stored.url.ends_with(&stored.key));
        assert_eq!(std::fs::read(root.join(&stored.key)).unwrap(), bytes);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let (storage, root) = local_storage(4);
        let result = storage
            .upload_image("big.png", "image/png", vec![0; 5])
            .await;
        assert!(matches!(result, Err(StorageError::FileTooLarge { .. })));
        assert!(!root.join("blog").exists());
    }
}

//! Image storage for blog uploads using Apache OpenDAL.
//!
//! Images land in an S3-compatible bucket or, in development, a local
//! directory. Keys look like `blog/{YYYY}/{MM}/{uuid}-{filename}`.

mod config;
mod error;
mod service;

pub use config::{ALLOWED_IMAGE_TYPES, DEFAULT_MAX_FILE_SIZE, ImageStorageConfig, StorageBackend};
pub use error::StorageError;
pub use service::{ImageStorage, StoredImage, image_key, sanitize_filename};

//! Admin image upload route.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    routing::post,
};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use regdesk_core::storage::{DEFAULT_MAX_FILE_SIZE, StoredImage};

/// Multipart overhead allowed on top of the file size limit.
const MULTIPART_SLACK: u64 = 64 * 1024;

/// Creates the upload router. The body limit follows the storage limit.
pub fn admin_routes(max_file_size: Option<u64>) -> Router<AppState> {
    let limit = max_file_size
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
        .saturating_add(MULTIPART_SLACK);
    Router::new()
        .route("/admin/uploads", post(upload))
        .layer(DefaultBodyLimit::max(
            usize::try_from(limit).unwrap_or(usize::MAX),
        ))
}

fn guess_content_type(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// POST /admin/uploads - Store the multipart `file` field.
async fn upload(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<StoredImage>), ApiError> {
    let Some(storage) = state.storage.clone() else {
        return Err(ApiError::unavailable("Image uploads are not configured"));
    };
    let mut multipart = multipart.map_err(|e| ApiError::validation(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), "invalid_upload", e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .filter(|ct| *ct != "application/octet-stream")
            .map(String::from)
            .or_else(|| guess_content_type(&filename).map(String::from))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), "invalid_upload", e.body_text()))?;

        let stored = storage
            .upload_image(&filename, &content_type, bytes.to_vec())
            .await?;
        info!(
            key = %stored.key,
            size = stored.size,
            admin = admin.username(),
            "Image uploaded"
        );
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(ApiError::validation("multipart field 'file' is required"))
}

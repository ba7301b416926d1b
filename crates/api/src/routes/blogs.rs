//! Blog routes: public reads and admin management.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::auth::AdminUser;
use regdesk_core::blog::{
    BlogStatus, CreatePostInput, PostDetail, PostFilter, PostSort, PostSummary, TagCount,
    UpdatePostInput,
};
use regdesk_shared::types::{PageRequest, PageResponse};

/// Public blog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_published))
        .route("/blogs/tags", get(tag_counts))
        .route("/blogs/{slug}", get(get_published))
        .route("/blogs/{slug}/related", get(related_posts))
}

/// Admin blog routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/blogs", get(list_posts).post(create_post))
        .route(
            "/admin/blogs/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let default = PageRequest::default();
    PageRequest::new(
        page.unwrap_or(default.page),
        per_page.unwrap_or(default.per_page),
    )
}

/// Query for the public listing.
#[derive(Debug, Default, Deserialize)]
pub struct PublicListQuery {
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Tag filter.
    pub tag: Option<String>,
    /// Title search.
    pub search: Option<String>,
}

/// Query for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
    /// Status filter.
    pub status: Option<BlogStatus>,
    /// Title search.
    pub search: Option<String>,
}

/// Query for related posts.
#[derive(Debug, Default, Deserialize)]
pub struct RelatedQuery {
    /// Maximum number of posts.
    pub limit: Option<usize>,
}

/// GET /blogs
async fn list_published(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PublicListQuery>,
) -> Result<Json<PageResponse<PostSummary>>, ApiError> {
    let page = page_request(query.page, query.per_page);
    let posts = state
        .blog
        .list_published(query.tag, query.search, page)
        .await?;
    Ok(Json(posts))
}

/// GET /blogs/tags
async fn tag_counts(State(state): State<AppState>) -> Result<Json<Vec<TagCount>>, ApiError> {
    Ok(Json(state.blog.tag_counts().await?))
}

/// GET /blogs/{slug}
async fn get_published(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<PostDetail>, ApiError> {
    Ok(Json(state.blog.get_published_by_slug(&slug).await?))
}

/// GET /blogs/{slug}/related
async fn related_posts(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<RelatedQuery>,
) -> Result<Json<Vec<PostSummary>>, ApiError> {
    Ok(Json(state.blog.related_posts(&slug, query.limit).await?))
}

/// GET /admin/blogs
async fn list_posts(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<AdminListQuery>,
) -> Result<Json<PageResponse<PostSummary>>, ApiError> {
    let filter = PostFilter {
        status: query.status,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        sort: PostSort::CreatedDesc,
        ..PostFilter::default()
    };
    let page = page_request(query.page, query.per_page);
    Ok(Json(state.blog.list_posts(&filter, page).await?))
}

/// POST /admin/blogs
async fn create_post(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(input): ApiJson<CreatePostInput>,
) -> Result<(StatusCode, Json<PostDetail>), ApiError> {
    let post = state.blog.create_post(input).await?;
    info!(post_id = %post.id, slug = %post.slug, admin = admin.username(), "Blog post created");
    Ok((StatusCode::CREATED, Json(PostDetail::from(post))))
}

/// GET /admin/blogs/{id}
async fn get_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PostDetail>, ApiError> {
    Ok(Json(state.blog.get_post(id).await?))
}

/// PUT /admin/blogs/{id}
async fn update_post(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdatePostInput>,
) -> Result<Json<PostDetail>, ApiError> {
    let post = state.blog.update_post(id, input).await?;
    info!(post_id = %post.id, status = %post.status, admin = admin.username(), "Blog post updated");
    Ok(Json(PostDetail::from(post)))
}

/// DELETE /admin/blogs/{id}
async fn delete_post(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.blog.delete_post(id).await?;
    info!(post_id = %id, admin = admin.username(), "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

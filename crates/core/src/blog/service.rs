//! Blog service implementation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regdesk_shared::types::{PageRequest, PageResponse};
use tracing::debug;
use uuid::Uuid;

use super::error::BlogError;
use super::related::{DEFAULT_RELATED_LIMIT, MAX_RELATED_LIMIT, rank_related};
use super::slug::slugify;
use super::types::{
    BlogPost, BlogStatus, CreatePostInput, PostDetail, PostFilter, PostSummary, TagCount,
    UpdatePostInput,
};
use super::validation::{
    self, MAX_AUTHOR, MAX_EXCERPT, MAX_FEATURED_IMAGE, MAX_META_DESCRIPTION, MAX_META_KEYWORDS,
    MAX_META_TITLE, MAX_TITLE, normalize_tags,
};

/// Repository trait for blog persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait BlogRepository: Send + Sync {
    /// Insert a new post. Fails with `DuplicateSlug` on a slug collision.
    fn insert(
        &self,
        post: BlogPost,
    ) -> impl std::future::Future<Output = Result<BlogPost, BlogError>> + Send;

    /// Overwrite an existing post. Fails with `DuplicateSlug` on a slug collision.
    fn update(
        &self,
        post: BlogPost,
    ) -> impl std::future::Future<Output = Result<BlogPost, BlogError>> + Send;

    /// Delete a post. Returns false if it did not exist.
    fn delete(&self, id: Uuid) -> impl std::future::Future<Output = Result<bool, BlogError>> + Send;

    /// Find post by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<BlogPost>, BlogError>> + Send;

    /// Find post by slug, any status.
    fn find_by_slug(
        &self,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Option<BlogPost>, BlogError>> + Send;

    /// List one page of posts matching the filter, with the total match count.
    fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<BlogPost>, u64), BlogError>> + Send;

    /// Published posts carrying at least one of the tags.
    fn published_with_any_tag(
        &self,
        tags: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<BlogPost>, BlogError>> + Send;

    /// Tag lists of all published posts.
    fn published_tag_sets(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<String>>, BlogError>> + Send;
}

/// Validates create input and builds the post to store.
///
/// # Errors
///
/// Returns a validation error for missing or oversized fields, an invalid
/// or reserved slug, or a title that yields no slug.
pub fn build_post(
    input: CreatePostInput,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<BlogPost, BlogError> {
    let title = validation::required("title", &input.title, MAX_TITLE)?;
    let content = validation::required("content", &input.content, usize::MAX)?;
    let author = validation::required("author", &input.author, MAX_AUTHOR)?;

    let slug = match input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => validation::slug(slug)?,
        None => {
            let derived = slugify(&title);
            if derived.is_empty() {
                return Err(BlogError::validation(
                    "slug is required when the title has no letters or digits",
                ));
            }
            validation::slug(&derived)?
        }
    };

    let status = input.status.unwrap_or_default();

    Ok(BlogPost {
        id,
        title,
        slug,
        excerpt: validation::optional("excerpt", input.excerpt.as_deref(), MAX_EXCERPT)?,
        content,
        author,
        tags: normalize_tags(&input.tags)?,
        status,
        featured_image: validation::optional(
            "featured_image",
            input.featured_image.as_deref(),
            MAX_FEATURED_IMAGE,
        )?,
        meta_title: validation::optional(
            "meta_title",
            input.meta_title.as_deref(),
            MAX_META_TITLE,
        )?,
        meta_description: validation::optional(
            "meta_description",
            input.meta_description.as_deref(),
            MAX_META_DESCRIPTION,
        )?,
        meta_keywords: validation::optional(
            "meta_keywords",
            input.meta_keywords.as_deref(),
            MAX_META_KEYWORDS,
        )?,
        created_at: now,
        updated_at: now,
        published_at: (status == BlogStatus::Published).then_some(now),
    })
}

fn patch_nullable(
    field: &str,
    current: Option<String>,
    patch: Option<Option<String>>,
    max: usize,
) -> Result<Option<String>, BlogError> {
    match patch {
        None => Ok(current),
        Some(value) => validation::optional(field, value.as_deref(), max),
    }
}

/// Applies a partial update to a post.
///
/// The first transition to `published` stamps `published_at`; later status
/// changes keep it.
///
/// # Errors
///
/// Returns a validation error for invalid field values.
pub fn apply_update(
    existing: BlogPost,
    input: UpdatePostInput,
    now: DateTime<Utc>,
) -> Result<BlogPost, BlogError> {
    let mut post = existing;

    if let Some(title) = input.title {
        post.title = validation::required("title", &title, MAX_TITLE)?;
    }
    if let Some(slug) = input.slug {
        post.slug = validation::slug(&slug)?;
    }
    if let Some(content) = input.content {
        post.content = validation::required("content", &content, usize::MAX)?;
    }
    if let Some(author) = input.author {
        post.author = validation::required("author", &author, MAX_AUTHOR)?;
    }
    if let Some(tags) = input.tags {
        post.tags = normalize_tags(&tags)?;
    }

    post.excerpt = patch_nullable("excerpt", post.excerpt, input.excerpt, MAX_EXCERPT)?;
    post.featured_image = patch_nullable(
        "featured_image",
        post.featured_image,
        input.featured_image,
        MAX_FEATURED_IMAGE,
    )?;
    post.meta_title = patch_nullable("meta_title", post.meta_title, input.meta_title, MAX_META_TITLE)?;
    post.meta_description = patch_nullable(
        "meta_description",
        post.meta_description,
        input.meta_description,
        MAX_META_DESCRIPTION,
    )?;
    post.meta_keywords = patch_nullable(
        "meta_keywords",
        post.meta_keywords,
        input.meta_keywords,
        MAX_META_KEYWORDS,
    )?;

    if let Some(status) = input.status {
        post.status = status;
        if status == BlogStatus::Published && post.published_at.is_none() {
            post.published_at = Some(now);
        }
    }

    post.updated_at = now;
    Ok(post)
}

/// Blog service for admin and public operations.
pub struct BlogService<R: BlogRepository> {
    repo: Arc<R>,
}

impl<R: BlogRepository> Clone for BlogService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: BlogRepository> BlogService<R> {
    /// Create a new blog service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn ensure_slug_free(&self, slug: &str, own_id: Option<Uuid>) -> Result<(), BlogError> {
        match self.repo.find_by_slug(slug).await? {
            Some(other) if Some(other.id) != own_id => Err(BlogError::DuplicateSlug(slug.to_string())),
            _ => Ok(()),
        }
    }

    /// Creates a post.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input or `DuplicateSlug` when the
    /// slug is taken.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<BlogPost, BlogError> {
        let post = build_post(input, Uuid::new_v4(), Utc::now())?;
        self.ensure_slug_free(&post.slug, None).await?;
        debug!(slug = %post.slug, status = %post.status, "Creating blog post");
        self.repo.insert(post).await
    }

    /// Updates a post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID, a validation error for bad
    /// input, or `DuplicateSlug` when the new slug is taken.
    pub async fn update_post(
        &self,
        id: Uuid,
        input: UpdatePostInput,
    ) -> Result<BlogPost, BlogError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| BlogError::NotFound(id.to_string()))?;

        let previous_slug = existing.slug.clone();
        let post = apply_update(existing, input, Utc::now())?;
        if post.slug != previous_slug {
            self.ensure_slug_free(&post.slug, Some(id)).await?;
        }

        self.repo.update(post).await
    }

    /// Deletes a post permanently.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), BlogError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(BlogError::NotFound(id.to_string()))
        }
    }

    /// Gets a post by ID regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID.
    pub async fn get_post(&self, id: Uuid) -> Result<PostDetail, BlogError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(PostDetail::from)
            .ok_or_else(|| BlogError::NotFound(id.to_string()))
    }

    /// Lists posts for the admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PageResponse<PostSummary>, BlogError> {
        let page = page.normalized();
        let (posts, total) = self.repo.list(filter, page).await?;
        Ok(PageResponse::new(posts, page, total).map(PostSummary::from))
    }

    /// Lists published posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_published(
        &self,
        tag: Option<String>,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<PageResponse<PostSummary>, BlogError> {
        self.list_posts(&PostFilter::published(tag, search), page)
            .await
    }

    async fn find_published(&self, slug: &str) -> Result<BlogPost, BlogError> {
        let slug = slug.trim().to_lowercase();
        let post = self.repo.find_by_slug(&slug).await?;
        post.filter(BlogPost::is_published)
            .ok_or(BlogError::NotFound(slug))
    }

    /// Gets a published post by slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` unless a published post has the slug.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<PostDetail, BlogError> {
        self.find_published(slug).await.map(PostDetail::from)
    }

    /// Published posts related to the given published post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` unless a published post has the slug.
    pub async fn related_posts(
        &self,
        slug: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PostSummary>, BlogError> {
        let target = self.find_published(slug).await?;
        let limit = limit
            .unwrap_or(DEFAULT_RELATED_LIMIT)
            .clamp(1, MAX_RELATED_LIMIT);

        if target.tags.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.repo.published_with_any_tag(&target.tags).await?;
        Ok(rank_related(&target, candidates, limit)
            .iter()
            .map(PostSummary::from)
            .collect())
    }

    /// Tag usage across published posts, most used first.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn tag_counts(&self) -> Result<Vec<TagCount>, BlogError> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for tags in self.repo.published_tag_sets().await? {
            for tag in tags {
                *counts.entry(tag).or_default() += 1;
            }
        }

        let mut counts: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::related::tests::{base_time, post};
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockBlogRepository {
        posts: Mutex<Vec<BlogPost>>,
    }

    impl MockBlogRepository {
        fn with(posts: Vec<BlogPost>) -> Self {
            Self {
                posts: Mutex::new(posts),
            }
        }

        fn slug_taken(&self, post: &BlogPost) -> bool {
            self.posts
                .lock()
                .unwrap()
                .iter()
                .any(|p| p.slug == post.slug && p.id != post.id)
        }
    }

    impl BlogRepository for MockBlogRepository {
        async fn insert(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
            if self.slug_taken(&post) {
                return Err(BlogError::DuplicateSlug(post.slug));
            }
            self.posts.lock().unwrap().push(post.clone());
            Ok(post)
        }

        async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
            if self.slug_taken(&post) {
                return Err(BlogError::DuplicateSlug(post.slug));
            }
            let mut posts = self.posts.lock().unwrap();
            let slot = posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or_else(|| BlogError::NotFound(post.id.to_string()))?;
            *slot = post.clone();
            Ok(post)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, BlogError> {
            let mut posts = self.posts.lock().unwrap();
            let before = posts.len();
            posts.retain(|p| p.id != id);
            Ok(posts.len() != before)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, BlogError> {
            Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, BlogError> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn list(
            &self,
            filter: &PostFilter,
            page: PageRequest,
        ) -> Result<(Vec<BlogPost>, u64), BlogError> {
            let mut matching: Vec<BlogPost> = self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            let total = matching.len() as u64;
            let data = matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect();
            Ok((data, total))
        }

        async fn published_with_any_tag(
            &self,
            tags: &[String],
        ) -> Result<Vec<BlogPost>, BlogError> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.is_published() && p.tags.iter().any(|t| tags.contains(t)))
                .cloned()
                .collect())
        }

        async fn published_tag_sets(&self) -> Result<Vec<Vec<String>>, BlogError> {
            Ok(self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.is_published())
                .map(|p| p.tags.clone())
                .collect())
        }
    }

    fn service(posts: Vec<BlogPost>) -> BlogService<MockBlogRepository> {
        BlogService::new(Arc::new(MockBlogRepository::with(posts)))
    }

    fn create_input(title: &str) -> CreatePostInput {
        CreatePostInput {
            title: title.to_string(),
            content: "<p>Everything you need to know.</p>".to_string(),
            author: "Editorial Team".to_string(),
            tags: vec!["GST".to_string(), " Compliance ".to_string()],
            ..CreatePostInput::default()
        }
    }

    #[test]
    fn test_build_post_defaults() {
        let post = build_post(create_input("GST Registration Guide"), Uuid::nil(), base_time())
            .unwrap();
        assert_eq!(post.slug, "gst-registration-guide");
        assert_eq!(post.status, BlogStatus::Draft);
        assert_eq!(post.tags, vec!["gst", "compliance"]);
        assert!(post.published_at.is_none());
        assert_eq!(post.created_at, base_time());
    }

    #[test]
    fn test_build_post_requires_fields() {
        let err = build_post(CreatePostInput::default(), Uuid::nil(), base_time()).unwrap_err();
        assert_eq!(err.to_string(), "title is required");

        let mut input = create_input("Title");
        input.author = " ".to_string();
        let err = build_post(input, Uuid::nil(), base_time()).unwrap_err();
        assert_eq!(err.to_string(), "author is required");
    }

    #[test]
    fn test_build_post_published_sets_timestamp() {
        let mut input = create_input("Launch");
        input.status = Some(BlogStatus::Published);
        let post = build_post(input, Uuid::nil(), base_time()).unwrap();
        assert_eq!(post.published_at, Some(base_time()));
    }

    #[test]
    fn test_build_post_rejects_reserved_slug() {
        let err = build_post(create_input("Tags"), Uuid::nil(), base_time()).unwrap_err();
        assert_eq!(err.to_string(), "slug 'tags' is reserved");

        let mut input = create_input("All topics");
        input.slug = Some("tags".to_string());
        assert!(matches!(
            build_post(input, Uuid::nil(), base_time()),
            Err(BlogError::Validation(_))
        ));

        let existing = post("gst-guide", &[], BlogStatus::Published, 0);
        let update = UpdatePostInput {
            slug: Some("tags".to_string()),
            ..UpdatePostInput::default()
        };
        assert!(matches!(
            apply_update(existing, update, base_time()),
            Err(BlogError::Validation(_))
        ));
    }

    #[test]
    fn test_build_post_rejects_long_meta_title() {
        let mut input = create_input("Title");
        input.meta_title = Some("m".repeat(71));
        assert!(matches!(
            build_post(input, Uuid::nil(), base_time()),
            Err(BlogError::Validation(_))
        ));
    }

    #[test]
    fn test_apply_update_clears_and_keeps_fields() {
        let mut existing = post("old-slug", &["gst"], BlogStatus::Draft, 0);
        existing.excerpt = Some("Old excerpt".to_string());
        existing.meta_title = Some("Old meta".to_string());

        let input: UpdatePostInput =
            serde_json::from_str(r#"{"excerpt":null,"title":"New title"}"#).unwrap();
        let later = base_time() + chrono::Duration::hours(1);
        let updated = apply_update(existing, input, later).unwrap();

        assert_eq!(updated.title, "New title");
        assert_eq!(updated.slug, "old-slug");
        assert_eq!(updated.excerpt, None);
        assert_eq!(updated.meta_title.as_deref(), Some("Old meta"));
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_apply_update_publish_then_archive_keeps_published_at() {
        let existing = post("draft", &[], BlogStatus::Draft, 0);
        let publish_time = base_time() + chrono::Duration::days(1);
        let published = apply_update(
            existing,
            UpdatePostInput {
                status: Some(BlogStatus::Published),
                ..UpdatePostInput::default()
            },
            publish_time,
        )
        .unwrap();
        assert_eq!(published.published_at, Some(publish_time));

        let archived = apply_update(
            published,
            UpdatePostInput {
                status: Some(BlogStatus::Archived),
                ..UpdatePostInput::default()
            },
            publish_time + chrono::Duration::days(1),
        )
        .unwrap();
        assert_eq!(archived.status, BlogStatus::Archived);
        assert_eq!(archived.published_at, Some(publish_time));
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let service = service(vec![]);
        service.create_post(create_input("Company Registration")).await.unwrap();

        let err = service
            .create_post(create_input("Company Registration!"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::DuplicateSlug(slug) if slug == "company-registration"));
    }

    #[tokio::test]
    async fn test_update_slug_to_taken_conflicts() {
        let first = post("first", &[], BlogStatus::Draft, 0);
        let second = post("second", &[], BlogStatus::Draft, 1);
        let second_id = second.id;
        let service = service(vec![first, second]);

        let err = service
            .update_post(
                second_id,
                UpdatePostInput {
                    slug: Some("first".to_string()),
                    ..UpdatePostInput::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::DuplicateSlug(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_post() {
        let err = service(vec![])
            .update_post(Uuid::new_v4(), UpdatePostInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_post() {
        let existing = post("bye", &[], BlogStatus::Draft, 0);
        let id = existing.id;
        let service = service(vec![existing]);

        service.delete_post(id).await.unwrap();
        assert!(matches!(service.get_post(id).await, Err(BlogError::NotFound(_))));
        assert!(matches!(service.delete_post(id).await, Err(BlogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_public_reads_only_published() {
        let service = service(vec![
            post("live", &["gst"], BlogStatus::Published, 1),
            post("draft", &["gst"], BlogStatus::Draft, 2),
            post("archived", &["gst"], BlogStatus::Archived, 3),
        ]);

        let page = service
            .list_published(None, None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.data[0].slug, "live");

        assert!(service.get_published_by_slug("live").await.is_ok());
        assert!(matches!(
            service.get_published_by_slug("draft").await,
            Err(BlogError::NotFound(_))
        ));
        assert!(matches!(
            service.get_published_by_slug("archived").await,
            Err(BlogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_published_by_tag() {
        let service = service(vec![
            post("gst-one", &["gst"], BlogStatus::Published, 1),
            post("llp-one", &["llp"], BlogStatus::Published, 2),
        ]);

        let page = service
            .list_published(Some("GST".into()), None, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].slug, "gst-one");
    }

    #[tokio::test]
    async fn test_related_posts_default_limit() {
        let mut posts = vec![post("target", &["gst", "tax"], BlogStatus::Published, 0)];
        posts.extend((1..=5).map(|i| post(&format!("gst-{i}"), &["gst"], BlogStatus::Published, i)));
        posts.push(post("both", &["gst", "tax"], BlogStatus::Published, -5));
        let service = service(posts);

        let related = service.related_posts("target", None).await.unwrap();
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["both", "gst-5", "gst-4"]);
    }

    #[tokio::test]
    async fn test_related_posts_of_draft_not_found() {
        let service = service(vec![post("draft", &["gst"], BlogStatus::Draft, 0)]);
        assert!(matches!(
            service.related_posts("draft", None).await,
            Err(BlogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_tag_counts() {
        let service = service(vec![
            post("a", &["gst", "tax"], BlogStatus::Published, 0),
            post("b", &["gst"], BlogStatus::Published, 1),
            post("c", &["llp"], BlogStatus::Published, 2),
            post("d", &["hidden"], BlogStatus::Draft, 3),
        ]);

        let counts = service.tag_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "gst".into(), count: 2 },
                TagCount { tag: "llp".into(), count: 1 },
                TagCount { tag: "tax".into(), count: 1 },
            ]
        );
    }
}

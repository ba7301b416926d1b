//! Blog repository for database operations.
//!
//! Implements the core `BlogRepository` trait using SeaORM.

use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};
use serde_json::json;
use uuid::Uuid;

use crate::entities::{blogs, sea_orm_active_enums::BlogStatus as DbBlogStatus};
use regdesk_core::blog::{
    BlogError, BlogPost, BlogRepository as BlogRepoTrait, BlogStatus, PostFilter, PostSort,
};
use regdesk_shared::types::PageRequest;

/// Blog repository implementation.
#[derive(Debug, Clone)]
pub struct BlogRepository {
    db: DatabaseConnection,
}

impl BlogRepository {
    /// Create a new blog repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &PostFilter) -> Select<blogs::Entity> {
        let mut query = blogs::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(blogs::Column::Status.eq(DbBlogStatus::from(status)));
        }
        if let Some(tag) = &filter.tag {
            query = query.filter(tag_contains(tag));
        }
        if let Some(search) = &filter.search {
            query = query.filter(Expr::cust_with_values(
                "title ILIKE ? ESCAPE '\\'",
                [format!("%{}%", escape_like(search))],
            ));
        }

        match filter.sort {
            PostSort::CreatedDesc => query.order_by_desc(blogs::Column::CreatedAt),
            PostSort::PublishedDesc => query
                .order_by_desc(blogs::Column::PublishedAt)
                .order_by_desc(blogs::Column::CreatedAt),
        }
    }
}

impl BlogRepoTrait for BlogRepository {
    async fn insert(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        let slug = post.slug.clone();
        let model = to_active_model(post)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, &slug))?;

        to_domain(model)
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        let id = post.id;
        let slug = post.slug.clone();
        let model = to_active_model(post)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => BlogError::NotFound(id.to_string()),
                other => map_write_error(other, &slug),
            })?;

        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BlogError> {
        let result = blogs::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, BlogError> {
        blogs::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, BlogError> {
        blogs::Entity::find()
            .filter(blogs::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?
            .map(to_domain)
            .transpose()
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<BlogPost>, u64), BlogError> {
        let page = page.normalized();
        let paginator = Self::filtered(filter).paginate(&self.db, page.limit());

        let total = paginator
            .num_items()
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?;
        let models = paginator
            .fetch_page(u64::from(page.page - 1))
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?;

        let posts = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((posts, total))
    }

    async fn published_with_any_tag(&self, tags: &[String]) -> Result<Vec<BlogPost>, BlogError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let any_tag = tags
            .iter()
            .fold(Condition::any(), |cond, tag| cond.add(tag_contains(tag)));

        blogs::Entity::find()
            .filter(blogs::Column::Status.eq(DbBlogStatus::Published))
            .filter(any_tag)
            .order_by_desc(blogs::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn published_tag_sets(&self) -> Result<Vec<Vec<String>>, BlogError> {
        let rows: Vec<serde_json::Value> = blogs::Entity::find()
            .select_only()
            .column(blogs::Column::Tags)
            .filter(blogs::Column::Status.eq(DbBlogStatus::Published))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| BlogError::repository(e.to_string()))?;

        rows.into_iter().map(parse_tags).collect()
    }
}

/// `tags @> '["tag"]'`, served by the GIN index.
fn tag_contains(tag: &str) -> SimpleExpr {
    Expr::cust_with_values("tags @> ?", [json!([tag])])
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_write_error(err: DbErr, slug: &str) -> BlogError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        BlogError::DuplicateSlug(slug.to_string())
    } else {
        BlogError::repository(err.to_string())
    }
}

fn parse_tags(value: serde_json::Value) -> Result<Vec<String>, BlogError> {
    serde_json::from_value(value).map_err(|e| BlogError::repository(format!("bad tags: {e}")))
}

fn to_active_model(post: BlogPost) -> blogs::ActiveModel {
    blogs::ActiveModel {
        id: Set(post.id),
        title: Set(post.title),
        slug: Set(post.slug),
        excerpt: Set(post.excerpt),
        content: Set(post.content),
        author: Set(post.author),
        tags: Set(json!(post.tags)),
        status: Set(post.status.into()),
        featured_image: Set(post.featured_image),
        meta_title: Set(post.meta_title),
        meta_description: Set(post.meta_description),
        meta_keywords: Set(post.meta_keywords),
        created_at: Set(post.created_at.into()),
        updated_at: Set(post.updated_at.into()),
        published_at: Set(post.published_at.map(Into::into)),
    }
}

fn to_domain(model: blogs::Model) -> Result<BlogPost, BlogError> {
    let status: BlogStatus = model.status.into();
    Ok(BlogPost {
        id: model.id,
        title: model.title,
        slug: model.slug,
        excerpt: model.excerpt,
        content: model.content,
        author: model.author,
        tags: parse_tags(model.tags)?,
        status,
        featured_image: model.featured_image,
        meta_title: model.meta_title,
        meta_description: model.meta_description,
        meta_keywords: model.meta_keywords,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        published_at: model.published_at.map(|t| t.with_timezone(&Utc)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gst", "gst")]
    #[case("100%", "100\\%")]
    #[case("a_b", "a\\_b")]
    #[case("c:\\x", "c:\\\\x")]
    fn test_escape_like(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like(input), expected);
    }

    #[test]
    fn test_model_round_trip_keeps_fields() {
        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            title: "GST basics".into(),
            slug: "gst-basics".into(),
            excerpt: None,
            content: "<p>Hello</p>".into(),
            author: "Team".into(),
            tags: vec!["gst".into(), "tax".into()],
            status: BlogStatus::Published,
            featured_image: None,
            meta_title: Some("GST".into()),
            meta_description: None,
            meta_keywords: None,
            created_at: now,
            updated_at: now,
            published_at: Some(now),
        };

        let active = to_active_model(post.clone());
        let model = blogs::Model {
            id: active.id.unwrap(),
            title: active.title.unwrap(),
            slug: active.slug.unwrap(),
            excerpt: active.excerpt.unwrap(),
            content: active.content.unwrap(),
            author: active.author.unwrap(),
            tags: active.tags.unwrap(),
            status: active.status.unwrap(),
            featured_image: active.featured_image.unwrap(),
            meta_title: active.meta_title.unwrap(),
            meta_description: active.meta_description.unwrap(),
            meta_keywords: active.meta_keywords.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
            published_at: active.published_at.unwrap(),
        };

        assert_eq!(model.tags, json!(["gst", "tax"]));
        assert_eq!(to_domain(model).unwrap(), post);
    }

    #[test]
    fn test_bad_tags_are_repository_errors() {
        assert!(matches!(
            parse_tags(json!({"not": "an array"})),
            Err(BlogError::Repository(_))
        ));
    }
}

//! Blog domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::{generate_excerpt, reading_time_minutes};

/// Publication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    /// Work in progress, admin only.
    #[default]
    Draft,
    /// Publicly visible.
    Published,
    /// Withdrawn from public view.
    Archived,
}

impl BlogStatus {
    /// Database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown blog status: {other}")),
        }
    }
}

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Post ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Unique URL slug.
    pub slug: String,
    /// Hand-written summary, if any.
    pub excerpt: Option<String>,
    /// HTML body.
    pub content: String,
    /// Author display name.
    pub author: String,
    /// Normalized tags.
    pub tags: Vec<String>,
    /// Publication status.
    pub status: BlogStatus,
    /// Cover image URL.
    pub featured_image: Option<String>,
    /// SEO title.
    pub meta_title: Option<String>,
    /// SEO description.
    pub meta_description: Option<String>,
    /// SEO keywords.
    pub meta_keywords: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// First publication time.
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Returns true if anonymous readers may see this post.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published
    }

    /// Number of tags shared with another post.
    #[must_use]
    pub fn shared_tag_count(&self, other: &Self) -> usize {
        self.tags.iter().filter(|t| other.tags.contains(t)).count()
    }
}

/// Input for creating a post.
///
/// Required fields default to empty so that a missing field surfaces as a
/// validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostInput {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Slug; derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,
    /// Summary.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// HTML body.
    #[serde(default)]
    pub content: String,
    /// Author display name.
    #[serde(default)]
    pub author: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Initial status, draft when absent.
    #[serde(default)]
    pub status: Option<BlogStatus>,
    /// Cover image URL.
    #[serde(default)]
    pub featured_image: Option<String>,
    /// SEO title.
    #[serde(default)]
    pub meta_title: Option<String>,
    /// SEO description.
    #[serde(default)]
    pub meta_description: Option<String>,
    /// SEO keywords.
    #[serde(default)]
    pub meta_keywords: Option<String>,
}

/// Partial update of a post.
///
/// Absent fields are left unchanged. For nullable fields an explicit `null`
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostInput {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// New or cleared summary.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub excerpt: Option<Option<String>>,
    /// New body.
    #[serde(default)]
    pub content: Option<String>,
    /// New author.
    #[serde(default)]
    pub author: Option<String>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New status.
    #[serde(default)]
    pub status: Option<BlogStatus>,
    /// New or cleared cover image.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub featured_image: Option<Option<String>>,
    /// New or cleared SEO title.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub meta_title: Option<Option<String>>,
    /// New or cleared SEO description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub meta_description: Option<Option<String>>,
    /// New or cleared SEO keywords.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub meta_keywords: Option<Option<String>>,
}

/// Sort order for post listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    /// Newest created first.
    #[default]
    CreatedDesc,
    /// Most recently published first.
    PublishedDesc,
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Restrict to one status.
    pub status: Option<BlogStatus>,
    /// Restrict to posts carrying this (normalized) tag.
    pub tag: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Sort order.
    pub sort: PostSort,
}

impl PostFilter {
    /// Filter for the public listing.
    #[must_use]
    pub fn published(tag: Option<String>, search: Option<String>) -> Self {
        Self {
            status: Some(BlogStatus::Published),
            tag: tag
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort: PostSort::PublishedDesc,
        }
    }

    /// Returns true if a post passes this filter.
    #[must_use]
    pub fn matches(&self, post: &BlogPost) -> bool {
        self.status.is_none_or(|s| post.status == s)
            && self.tag.as_ref().is_none_or(|t| post.tags.contains(t))
            && self.search.as_ref().is_none_or(|q| {
                post.title.to_lowercase().contains(&q.to_lowercase())
            })
    }
}

/// List item for post listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// Post ID.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Slug.
    pub slug: String,
    /// Stored excerpt, or one generated from the content.
    pub excerpt: String,
    /// Author.
    pub author: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Status.
    pub status: BlogStatus,
    /// Cover image URL.
    pub featured_image: Option<String>,
    /// First publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Estimated reading time.
    pub reading_time_minutes: u32,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post
                .excerpt
                .clone()
                .unwrap_or_else(|| generate_excerpt(&post.content)),
            author: post.author.clone(),
            tags: post.tags.clone(),
            status: post.status,
            featured_image: post.featured_image.clone(),
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
            reading_time_minutes: reading_time_minutes(&post.content),
        }
    }
}

impl From<BlogPost> for PostSummary {
    fn from(post: BlogPost) -> Self {
        Self::from(&post)
    }
}

/// Full post with derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    /// Stored post.
    #[serde(flatten)]
    pub post: BlogPost,
    /// Estimated reading time.
    pub reading_time_minutes: u32,
}

impl From<BlogPost> for PostDetail {
    fn from(post: BlogPost) -> Self {
        let reading_time_minutes = reading_time_minutes(&post.content);
        Self {
            post,
            reading_time_minutes,
        }
    }
}

/// Usage count of a tag across published posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    /// Tag.
    pub tag: String,
    /// Number of published posts carrying it.
    pub count: u64,
}

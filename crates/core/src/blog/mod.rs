//! Blog CMS domain.
//!
//! Posts move through `draft -> published -> archived`. Only published posts
//! are ever visible to anonymous readers.

mod content;
mod error;
mod related;
mod service;
mod slug;
mod types;
mod validation;

#[cfg(test)]
mod props;

pub use content::{generate_excerpt, reading_time_minutes, strip_html};
pub use error::BlogError;
pub use related::{DEFAULT_RELATED_LIMIT, MAX_RELATED_LIMIT, rank_related};
pub use service::{BlogRepository, BlogService, apply_update, build_post};
pub use slug::{is_valid_slug, slugify};
pub use types::{
    BlogPost, BlogStatus, CreatePostInput, PostDetail, PostFilter, PostSort, PostSummary,
    TagCount, UpdatePostInput,
};
pub use validation::normalize_tags;

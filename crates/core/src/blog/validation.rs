//! Field validation and normalization for blog input.

use super::error::BlogError;
use super::slug::{MAX_SLUG_LENGTH, is_reserved_slug, is_valid_slug};

pub(crate) const MAX_TITLE: usize = 200;
pub(crate) const MAX_EXCERPT: usize = 500;
pub(crate) const MAX_AUTHOR: usize = 100;
pub(crate) const MAX_META_TITLE: usize = 70;
pub(crate) const MAX_META_DESCRIPTION: usize = 160;
pub(crate) const MAX_META_KEYWORDS: usize = 255;
pub(crate) const MAX_FEATURED_IMAGE: usize = 2048;
const MAX_TAGS: usize = 10;
const MAX_TAG_LENGTH: usize = 50;

/// Trims a required field and checks its length in characters.
pub(crate) fn required(field: &str, value: &str, max: usize) -> Result<String, BlogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BlogError::validation(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(BlogError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Trims an optional field, treating blank as absent.
pub(crate) fn optional(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, BlogError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(BlogError::validation(format!(
            "{field} must be at most {max} characters"
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Normalizes an explicitly supplied slug.
pub(crate) fn slug(value: &str) -> Result<String, BlogError> {
    let slug = value.trim().to_lowercase();
    if !is_valid_slug(&slug) {
        return Err(BlogError::validation(format!(
            "slug must be 1-{MAX_SLUG_LENGTH} lowercase letters, digits or single hyphens"
        )));
    }
    if is_reserved_slug(&slug) {
        return Err(BlogError::validation(format!("slug '{slug}' is reserved")));
    }
    Ok(slug)
}

/// Normalizes a tag list.
///
/// Tags are trimmed and lowercased; blanks are dropped and duplicates removed
/// keeping the first occurrence.
///
/// # Errors
///
/// Returns a validation error for a tag longer than 50 characters or more
/// than 10 distinct tags.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, BlogError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalized.contains(&tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(BlogError::validation(format!(
                "tags must be at most {MAX_TAG_LENGTH} characters"
            )));
        }
        normalized.push(tag);
    }

    if normalized.len() > MAX_TAGS {
        return Err(BlogError::validation(format!(
            "at most {MAX_TAGS} tags are allowed"
        )));
    }

    Ok(normalized)
}

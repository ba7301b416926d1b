//! URL slugs.

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Slugs that collide with static routes under `/blogs`.
pub const RESERVED_SLUGS: &[&str] = &["tags"];

/// Returns true when `slug` is taken by a static route.
#[must_use]
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// Derives a slug from free text.
///
/// Lowercases ASCII letters, keeps digits, and turns every other run of
/// characters into a single hyphen. May return an empty string.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Returns true for `[a-z0-9]+(-[a-z0-9]+)*` up to [`MAX_SLUG_LENGTH`].
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

//! Tag-based related post ranking.

use std::cmp::Reverse;

use super::types::BlogPost;

/// Related posts returned when no limit is given.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Largest accepted related post limit.
pub const MAX_RELATED_LIMIT: usize = 10;

/// Ranks candidate posts by how related they are to `target`.
///
/// Only published posts sharing at least one tag with the target are kept,
/// excluding the target itself. Ranking is by shared tag count, then most
/// recently published, then slug.
#[must_use]
pub fn rank_related(target: &BlogPost, candidates: Vec<BlogPost>, limit: usize) -> Vec<BlogPost> {
    let mut scored: Vec<(usize, BlogPost)> = candidates
        .into_iter()
        .filter(|post| post.id != target.id && post.is_published())
        .map(|post| (target.shared_tag_count(&post), post))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    scored.sort_by(|(a_shared, a), (b_shared, b)| {
        b_shared
            .cmp(a_shared)
            .then_with(|| Reverse(a.published_at).cmp(&Reverse(b.published_at)))
            .then_with(|| a.slug.cmp(&b.slug))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, post)| post)
        .collect()
}

//! Property-based tests for blog normalization and ranking.

use proptest::prelude::*;

use super::related::rank_related;
use super::related::tests::post;
use super::slug::{is_valid_slug, slugify};
use super::types::BlogStatus;
use super::validation::normalize_tags;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// A derived slug is either empty or valid.
    #[test]
    fn prop_slugify_valid_or_empty(title in ".{0,300}") {
        let slug = slugify(&title);
        prop_assert!(slug.is_empty() || is_valid_slug(&slug), "bad slug {:?}", slug);
    }

    /// Slugifying a slug changes nothing.
    #[test]
    fn prop_slugify_idempotent(title in "[A-Za-z0-9 ,.!-]{1,100}") {
        let once = slugify(&title);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Normalized tags are lowercase, trimmed and unique.
    #[test]
    fn prop_normalize_tags(tags in prop::collection::vec("[ a-zA-Z]{0,12}", 0..10)) {
        let out = normalize_tags(&tags).unwrap();
        for (i, tag) in out.iter().enumerate() {
            prop_assert_eq!(tag, &tag.trim().to_lowercase());
            prop_assert!(!tag.is_empty());
            prop_assert!(!out[i + 1..].contains(tag));
        }
        prop_assert!(normalize_tags(&out).unwrap() == out);
    }

    /// Related posts always share a tag, are published and respect the limit.
    #[test]
    fn prop_related_posts_share_tags(
        candidate_tags in prop::collection::vec(
            prop::collection::vec(prop_oneof![Just("gst"), Just("llp"), Just("tax"), Just("trademark")], 0..3),
            0..12,
        ),
        published in prop::collection::vec(any::<bool>(), 12),
        limit in 1usize..=10,
    ) {
        let target = post("target", &["gst", "tax"], BlogStatus::Published, 0);
        let candidates = candidate_tags
            .iter()
            .enumerate()
            .map(|(i, tags)| {
                let status = if published[i] { BlogStatus::Published } else { BlogStatus::Draft };
                post(&format!("post-{i}"), tags, status, i64::try_from(i).unwrap())
            })
            .collect();

        let ranked = rank_related(&target, candidates, limit);
        prop_assert!(ranked.len() <= limit);
        for (i, p) in ranked.iter().enumerate() {
            prop_assert!(p.is_published());
            prop_assert!(target.shared_tag_count(p) > 0);
            if let Some(next) = ranked.get(i + 1) {
                prop_assert!(target.shared_tag_count(p) >= target.shared_tag_count(next));
            }
        }
    }
}

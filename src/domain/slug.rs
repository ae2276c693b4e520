//! Title → URL slug derivation and slug → entity lookup.
//!
//! Slugs are never stored. Every lookup recomputes them from titles, so two
//! items whose titles normalize identically share a slug and only the first
//! one in collection order is reachable by URL.

use crate::domain::model::Content;
use crate::utils::error::{ContentError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"[^a-z0-9 \-]"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"\s+"))
}

fn hyphen_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"-+"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Wraps a route segment verbatim; use [`slugify`] to derive one from a title.
    pub fn new(segment: impl Into<String>) -> Self {
        Self(segment.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Slug {
    fn from(segment: &str) -> Self {
        Slug::new(segment)
    }
}

/// Lowercases, drops everything outside `[a-z0-9 -]`, joins words with single
/// hyphens and trims edge hyphens. Symbol-only input yields an empty slug.
pub fn slugify(title: &str) -> Slug {
    let lowered = title.to_lowercase();
    let kept = disallowed_chars().replace_all(&lowered, "");
    let hyphenated = whitespace_runs().replace_all(&kept, "-");
    let collapsed = hyphen_runs().replace_all(&hyphenated, "-");
    Slug(collapsed.trim_matches('-').to_string())
}

/// First item, in collection order, whose title slugifies to `slug`.
pub fn resolve_by_slug<'a, T: Content>(items: &'a [T], slug: &Slug) -> Result<&'a T> {
    items
        .iter()
        .find(|item| item.slug() == *slug)
        .ok_or_else(|| ContentError::not_found(format!("slug '{}'", slug)))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugCollision {
    pub slug: Slug,
    pub ids: Vec<u64>,
}

/// Slugs produced by more than one item id, in first-seen order.
pub fn slug_collisions<T: Content>(items: &[T]) -> Vec<SlugCollision> {
    let mut order: Vec<Slug> = Vec::new();
    let mut ids_by_slug: HashMap<Slug, Vec<u64>> = HashMap::new();

    for item in items {
        let slug = item.slug();
        let ids = ids_by_slug.entry(slug.clone()).or_insert_with(|| {
            order.push(slug);
            Vec::new()
        });
        if !ids.contains(&item.id()) {
            ids.push(item.id());
        }
    }

    order
        .into_iter()
        .filter_map(|slug| {
            let ids = ids_by_slug.remove(&slug)?;
            (ids.len() > 1).then_some(SlugCollision { slug, ids })
        })
        .collect()
}

/// Logs every collision in `items` under `resource`.
pub fn warn_on_collisions<T: Content>(resource: &str, items: &[T]) {
    for collision in slug_collisions(items) {
        tracing::warn!(
            "⚠️ {}: slug '{}' is shared by ids {:?}; only the first is reachable",
            resource,
            collision.slug,
            collision.ids
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Article;

    fn article(id: u64, title: &str) -> Article {
        serde_json::from_value(serde_json::json!({"id": id, "title": title})).unwrap()
    }

    #[test]
    fn test_slugify_basic_title() {
        assert_eq!(slugify("Cloud Solutions").as_str(), "cloud-solutions");
        assert_eq!(
            slugify(slugify("Cloud Solutions").as_str()).as_str(),
            "cloud-solutions"
        );
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(
            slugify("SEO Trends to Watch in 2024!").as_str(),
            "seo-trends-to-watch-in-2024"
        );
        assert_eq!(
            slugify("AWS vs Azure: Choosing the Right Cloud Platform").as_str(),
            "aws-vs-azure-choosing-the-right-cloud-platform"
        );
    }

    #[test]
    fn test_slugify_collapses_and_trims_hyphens() {
        assert_eq!(slugify("  -- Hello   ---  World --  ").as_str(), "hello-world");
        assert_eq!(slugify("UI/UX Design").as_str(), "uiux-design");
        assert_eq!(slugify("Café Menus").as_str(), "caf-menus");
    }

    #[test]
    fn test_slugify_symbol_only_is_empty() {
        assert!(slugify("!!! ???").is_empty());
        assert!(slugify("").is_empty());
    }

    #[test]
    fn test_resolve_by_slug_finds_match() {
        let items = vec![
            article(1, "SEO Trends to Watch in 2024!"),
            article(2, "AWS vs Azure: Choosing the Right Cloud Platform"),
        ];

        let found = resolve_by_slug(
            &items,
            &Slug::from("aws-vs-azure-choosing-the-right-cloud-platform"),
        )
        .unwrap();
        assert_eq!(found.id, 2);
    }

    #[test]
    fn test_resolve_by_slug_not_found() {
        let items = vec![article(1, "Cloud Solutions")];
        let err = resolve_by_slug(&items, &Slug::from("missing-article")).unwrap_err();
        assert!(matches!(err, ContentError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_by_slug_returns_first_on_collision() {
        let items = vec![
            article(4, "Cloud Solutions"),
            article(9, "Cloud  Solutions!"),
        ];
        let found = resolve_by_slug(&items, &Slug::from("cloud-solutions")).unwrap();
        assert_eq!(found.id, 4);

        let collisions = slug_collisions(&items);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].ids, vec![4, 9]);
    }

    #[test]
    fn test_no_collision_for_distinct_titles() {
        let items = vec![article(1, "Cloud Solutions"), article(2, "Web Development")];
        assert!(slug_collisions(&items).is_empty());
    }
}

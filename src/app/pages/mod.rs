pub mod articles;
pub mod industries;
pub mod projects;
pub mod routes;
pub mod services;

pub use articles::{ArticleDetailPage, ArticleDetailView, ArticleListPage, ArticleListView};
pub use industries::{IndustryPage, IndustryView};
pub use projects::{ProjectDetailPage, ProjectDetailView, ProjectListPage, ProjectListView};
pub use routes::{Route, RouteCollision, RoutesPage, RoutesView};
pub use services::{ServiceDetailPage, ServiceDetailView, ServicesPage, ServicesView};

use crate::domain::model::{Content, FetchResult, Page};
use crate::domain::slug::{resolve_by_slug, warn_on_collisions, Slug};
use crate::utils::error::{ContentError, Result};
use std::future::Future;
use std::time::Duration;

/// Hard stop for walking paginated collections.
pub const MAX_PAGES: u32 = 20;

/// Awaits `fetch`, failing with `TimeoutError` once `limit` has passed.
pub(crate) async fn bounded<T, Fut>(limit: Option<Duration>, fetch: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match limit {
        Some(after) => tokio::time::timeout(after, fetch)
            .await
            .unwrap_or(Err(ContentError::TimeoutError { after })),
        None => fetch.await,
    }
}

/// Runs a follow-up request within `limit`. A failure or timeout empties
/// only this section.
pub(crate) async fn follow_up<T, Fut>(
    section: &str,
    limit: Option<Duration>,
    fetch: Fut,
) -> FetchResult<Vec<T>>
where
    Fut: Future<Output = Result<Vec<T>>>,
{
    match bounded(limit, fetch).await {
        Ok(items) => {
            tracing::debug!("📎 {}: {} items", section, items.len());
            FetchResult::Ok { data: items }
        }
        Err(e) => {
            tracing::warn!("⚠️ {}: follow-up failed ({}), section left empty", section, e);
            FetchResult::Fallback {
                fallback: Vec::new(),
                reason: e.user_friendly_message(),
            }
        }
    }
}

/// Like [`follow_up`], but only issued when the primary result produced an id.
pub(crate) async fn follow_up_for<T, F, Fut>(
    section: &str,
    limit: Option<Duration>,
    id: Option<u64>,
    fetch: F,
) -> FetchResult<Vec<T>>
where
    F: FnOnce(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    match id {
        Some(id) => follow_up(section, limit, fetch(id)).await,
        None => {
            tracing::debug!("📎 {}: no id on primary result, skipped", section);
            FetchResult::Ok { data: Vec::new() }
        }
    }
}

/// Walks pages from `page=1` until an item's slug matches. Returns the match and every
/// item fetched up to and including the page it was found on. Later pages are never
/// requested, so callers picking related items only see what was walked.
pub(crate) async fn find_in_pages<T, F, Fut>(
    resource: &str,
    slug: &Slug,
    mut fetch: F,
) -> Result<(T, Vec<T>)>
where
    T: Content + Clone,
    F: FnMut(Option<u32>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut seen: Vec<T> = Vec::new();

    for page_number in 1..=MAX_PAGES {
        let page = fetch(Some(page_number)).await?;
        let has_more = page.has_more();
        let start = seen.len();
        seen.extend(page.items);

        // earlier pages already missed, so the first match overall is on this page
        if let Ok(found) = resolve_by_slug(&seen[start..], slug) {
            let found = found.clone();
            warn_on_collisions(resource, &seen);
            return Ok((found, seen));
        }

        if !has_more {
            break;
        }
    }

    warn_on_collisions(resource, &seen);
    Err(ContentError::not_found(format!("{} '{}'", resource, slug)))
}

/// Every item of a paginated collection, up to [`MAX_PAGES`] pages.
pub(crate) async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<u32>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();

    for page_number in 1..=MAX_PAGES {
        let page = fetch(Some(page_number)).await?;
        let has_more = page.has_more();
        items.extend(page.items);
        if !has_more {
            break;
        }
    }

    Ok(items)
}

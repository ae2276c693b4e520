use crate::app::pages::{bounded, find_in_pages};
use crate::domain::model::{Article, FetchResult, Page, Relation};
use crate::domain::ports::{ContentSource, PageLoad};
use crate::domain::related::{related, RelatedSet};
use crate::domain::slug::{warn_on_collisions, Slug};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Paginated blog listing.
pub struct ArticleListPage {
    page: Option<u32>,
}

impl ArticleListPage {
    pub fn new(page: Option<u32>) -> Self {
        Self { page }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleListView {
    pub articles: Page<Article>,
}

#[async_trait]
impl PageLoad for ArticleListPage {
    type View = ArticleListView;

    fn name(&self) -> &str {
        "articles"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ArticleListView> {
        let articles = source.articles(self.page).await?;
        warn_on_collisions("articles", &articles.items);
        Ok(ArticleListView { articles })
    }
}

/// `/article/{slug}`
pub struct ArticleDetailPage {
    slug: Slug,
}

impl ArticleDetailPage {
    pub fn new(slug: Slug) -> Self {
        Self { slug }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDetailView {
    /// Full article, or the listing summary when the detail request failed
    pub article: FetchResult<Article>,
    /// Other articles for the same service
    pub related: RelatedSet<Article>,
}

#[async_trait]
impl PageLoad for ArticleDetailPage {
    type View = ArticleDetailView;

    fn name(&self) -> &str {
        "article-detail"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ArticleDetailView> {
        let (summary, seen) =
            find_in_pages("articles", &self.slug, |page| source.articles(page)).await?;
        let related = related(&seen, &summary, Relation::Service);

        let article = match bounded(source.request_timeout(), source.article(summary.id)).await {
            Ok(full) => FetchResult::Ok { data: full },
            Err(e) => {
                tracing::warn!(
                    "⚠️ article {}: detail request failed ({}), showing listing summary",
                    summary.id,
                    e
                );
                FetchResult::Fallback {
                    fallback: summary,
                    reason: e.user_friendly_message(),
                }
            }
        };

        Ok(ArticleDetailView { article, related })
    }
}

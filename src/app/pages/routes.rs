use crate::app::pages::collect_pages;
use crate::domain::model::{Content, ContentItem};
use crate::domain::ports::{ContentSource, PageLoad};
use crate::domain::slug::{slug_collisions, Slug};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// Every slug route the site can serve, for sitemaps and link checks.
pub struct RoutesPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: String,
    pub kind: &'static str,
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
}

/// Items under the same prefix whose titles share a slug; only the first
/// one listed is reachable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCollision {
    pub prefix: &'static str,
    pub slug: Slug,
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutesView {
    pub routes: Vec<Route>,
    pub collisions: Vec<RouteCollision>,
}

impl RoutesView {
    pub fn from_groups(groups: Vec<Vec<ContentItem>>) -> Self {
        let mut routes = Vec::new();
        let mut collisions = Vec::new();

        for group in groups {
            let Some(prefix) = group.first().map(ContentItem::route_prefix) else {
                continue;
            };

            collisions.extend(slug_collisions(&group).into_iter().map(|c| RouteCollision {
                prefix,
                slug: c.slug,
                ids: c.ids,
            }));

            routes.extend(group.iter().map(|item| Route {
                path: item.route(),
                kind: item.kind(),
                id: item.id(),
                title: item.title().to_string(),
                last_modified: item.date(),
            }));
        }

        for collision in &collisions {
            tracing::warn!(
                "⚠️ {}/{} is claimed by ids {:?}",
                collision.prefix,
                collision.slug,
                collision.ids
            );
        }

        Self { routes, collisions }
    }
}

#[async_trait]
impl PageLoad for RoutesPage {
    type View = RoutesView;

    fn name(&self) -> &str {
        "routes"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<RoutesView> {
        let services = source.services().await?;
        let articles = collect_pages(|page| source.articles(page)).await?;
        let projects = collect_pages(|page| source.projects(page)).await?;

        Ok(RoutesView::from_groups(vec![
            services.into_iter().map(ContentItem::Service).collect(),
            articles.into_iter().map(ContentItem::Article).collect(),
            projects.into_iter().map(ContentItem::Project).collect(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticSource;

    #[tokio::test]
    async fn test_offline_catalog_routes() {
        let source = StaticSource::embedded().unwrap();
        let view = RoutesPage.load(&source).await.unwrap();

        assert_eq!(view.routes.len(), 17);
        assert!(view.collisions.is_empty());
        assert!(view
            .routes
            .iter()
            .any(|r| r.path == "/article/aws-vs-azure-choosing-the-right-cloud-platform"));
        assert!(view
            .routes
            .iter()
            .any(|r| r.path == "/work/projects/loyalty-app-launch" && r.kind == "project"));
        assert!(view.routes.iter().any(|r| r.path == "/services/cloud-solutions"));

        let aws = view
            .routes
            .iter()
            .find(|r| r.kind == "article" && r.id == 1)
            .unwrap();
        assert_eq!(aws.last_modified, NaiveDate::from_ymd_opt(2024, 2, 12));
        assert!(view.routes.iter().all(|r| r.last_modified.is_some()));
    }

    #[test]
    fn test_collisions_are_scoped_per_prefix() {
        let article = |id: u64, title: &str| {
            ContentItem::Article(
                serde_json::from_value(serde_json::json!({"id": id, "title": title})).unwrap(),
            )
        };
        let project = |id: u64, title: &str| {
            ContentItem::Project(
                serde_json::from_value(serde_json::json!({"id": id, "title": title})).unwrap(),
            )
        };

        let view = RoutesView::from_groups(vec![
            vec![article(1, "Cloud Solutions"), article(2, "Cloud Solutions!")],
            vec![project(3, "Cloud Solutions")],
        ]);

        assert_eq!(view.routes.len(), 3);
        assert_eq!(view.collisions.len(), 1);
        assert_eq!(view.collisions[0].prefix, "/article");
        assert_eq!(view.collisions[0].ids, vec![1, 2]);
    }
}

use crate::domain::model::{Article, Content, Industry, Page, Project, Relation, Service};
use crate::domain::ports::ContentSource;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use serde::Deserialize;

const EMBEDDED_CATALOG: &str = include_str!("../../data/fallback.json");

/// Offline content shown when the API cannot be reached.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackCatalog {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub industries: Vec<Industry>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// `ContentSource` that answers from a fixed catalog and never touches the network.
#[derive(Debug, Clone)]
pub struct StaticSource {
    catalog: FallbackCatalog,
}

impl StaticSource {
    pub fn new(catalog: FallbackCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let catalog: FallbackCatalog = serde_json::from_str(EMBEDDED_CATALOG)?;
        tracing::debug!(
            "Loaded offline catalog: {} services, {} articles, {} projects, {} industries",
            catalog.services.len(),
            catalog.articles.len(),
            catalog.projects.len(),
            catalog.industries.len()
        );
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }
}

fn find_by_id<T: Content + Clone>(items: &[T], id: u64, resource: &str) -> Result<T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or_else(|| ContentError::not_found(format!("{} {}", resource, id)))
}

fn with_relation<T: Content + Clone>(items: &[T], relation: Relation, id: u64) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.relation_id(relation) == Some(id))
        .cloned()
        .collect()
}

#[async_trait]
impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.catalog.services.clone())
    }

    async fn service(&self, id: u64) -> Result<Service> {
        find_by_id(&self.catalog.services, id, "service")
    }

    async fn articles(&self, _page: Option<u32>) -> Result<Page<Article>> {
        Ok(Page::single(self.catalog.articles.clone()))
    }

    async fn article(&self, id: u64) -> Result<Article> {
        find_by_id(&self.catalog.articles, id, "article")
    }

    async fn projects(&self, _page: Option<u32>) -> Result<Page<Project>> {
        Ok(Page::single(self.catalog.projects.clone()))
    }

    async fn project(&self, id: u64) -> Result<Project> {
        find_by_id(&self.catalog.projects, id, "project")
    }

    async fn industry(&self, id: u64) -> Result<Industry> {
        self.catalog
            .industries
            .iter()
            .find(|industry| industry.id == id)
            .cloned()
            .ok_or_else(|| ContentError::not_found(format!("industry {}", id)))
    }

    async fn service_projects(&self, service_id: u64) -> Result<Vec<Project>> {
        Ok(with_relation(&self.catalog.projects, Relation::Service, service_id))
    }

    async fn service_articles(&self, service_id: u64) -> Result<Vec<Article>> {
        Ok(with_relation(&self.catalog.articles, Relation::Service, service_id))
    }

    async fn industry_articles(&self, industry_id: u64) -> Result<Vec<Article>> {
        Ok(with_relation(&self.catalog.articles, Relation::Industry, industry_id))
    }
}

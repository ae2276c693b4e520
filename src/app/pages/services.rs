use crate::app::pages::follow_up;
use crate::domain::model::{Article, FetchResult, Project, Service};
use crate::domain::ports::{ContentSource, PageLoad};
use crate::domain::slug::{resolve_by_slug, warn_on_collisions, Slug};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;

pub struct ServicesPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesView {
    pub services: Vec<Service>,
}

#[async_trait]
impl PageLoad for ServicesPage {
    type View = ServicesView;

    fn name(&self) -> &str {
        "services"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ServicesView> {
        let services = source.services().await?;
        warn_on_collisions("services", &services);
        Ok(ServicesView { services })
    }
}

/// `/services/{slug}`: the service plus its projects and articles.
pub struct ServiceDetailPage {
    slug: Slug,
}

impl ServiceDetailPage {
    pub fn new(slug: Slug) -> Self {
        Self { slug }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDetailView {
    pub service: Service,
    pub projects: FetchResult<Vec<Project>>,
    pub articles: FetchResult<Vec<Article>>,
}

#[async_trait]
impl PageLoad for ServiceDetailPage {
    type View = ServiceDetailView;

    fn name(&self) -> &str {
        "service-detail"
    }

    async fn load(&self, source: &dyn ContentSource) -> Result<ServiceDetailView> {
        let services = source.services().await?;
        warn_on_collisions("services", &services);
        let service = resolve_by_slug(&services, &self.slug)?.clone();

        let limit = source.request_timeout();
        let (projects, articles) = tokio::join!(
            follow_up("service projects", limit, source.service_projects(service.id)),
            follow_up("service articles", limit, source.service_articles(service.id)),
        );

        Ok(ServiceDetailView {
            service,
            projects,
            articles,
        })
    }
}

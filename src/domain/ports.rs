use crate::domain::model::{Article, Industry, Page, Project, Service};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Where page content comes from: the live API or the embedded offline catalog.
#[async_trait]
pub trait ContentSource: Send + Sync {
    fn name(&self) -> &str;

    /// Budget for one request against this source. Follow-up sections are
    /// cut off after it; `None` means the source never blocks.
    fn request_timeout(&self) -> Option<Duration> {
        None
    }

    async fn services(&self) -> Result<Vec<Service>>;
    async fn service(&self, id: u64) -> Result<Service>;
    async fn articles(&self, page: Option<u32>) -> Result<Page<Article>>;
    async fn article(&self, id: u64) -> Result<Article>;
    async fn projects(&self, page: Option<u32>) -> Result<Page<Project>>;
    async fn project(&self, id: u64) -> Result<Project>;
    async fn industry(&self, id: u64) -> Result<Industry>;

    async fn service_projects(&self, service_id: u64) -> Result<Vec<Project>>;
    async fn service_articles(&self, service_id: u64) -> Result<Vec<Article>>;
    async fn industry_articles(&self, industry_id: u64) -> Result<Vec<Article>>;
}

/// One page's data requirements. The loader runs it against the remote
/// source first and against the offline source when that fails.
#[async_trait]
pub trait PageLoad: Send + Sync {
    type View: Clone + Serialize + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn load(&self, source: &dyn ContentSource) -> Result<Self::View>;
}

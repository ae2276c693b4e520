use crate::config::site_config::SiteConfig;
use crate::domain::envelope::{unwrap_entity, CollectionEnvelope};
use crate::domain::model::{Article, Industry, Page, Project, Service};
use crate::domain::ports::ContentSource;
use crate::utils::error::{ContentError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// `ContentSource` backed by the public REST API.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    base_url: String,
    client: Client,
    timeout: Option<Duration>,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut source = Self::with_client(base_url, client);
        source.timeout = Some(timeout);
        Ok(source)
    }

    /// Wraps a prebuilt client. Its timeout is unknown here, so follow-ups
    /// are only bounded by whatever the client enforces.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            timeout: None,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.api.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json(&self, url: &str, page: Option<u32>) -> Result<serde_json::Value> {
        let mut request = self.client.get(url);
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }

        tracing::debug!("📡 GET {} (page {:?})", url, page);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {} -> {}", url, status);

        if !status.is_success() {
            return Err(ContentError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ContentError::malformed(url, e.to_string()))
    }

    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        page: Option<u32>,
    ) -> Result<Page<T>> {
        let url = self.endpoint(path);
        let body = self.get_json(&url, page).await?;
        let envelope = CollectionEnvelope::classify(body, key);
        if matches!(envelope, CollectionEnvelope::Unrecognized) {
            tracing::warn!("⚠️ {}: unrecognized collection shape, treating as empty", url);
        } else {
            tracing::debug!("📡 {}: '{}' envelope", url, envelope.shape());
        }
        envelope
            .into_page()
            .map_err(|e| ContentError::malformed(&url, e.to_string()))
    }

    async fn fetch_entity<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        let body = self.get_json(&url, None).await?;
        serde_json::from_value(unwrap_entity(body)).map_err(|e| ContentError::malformed(&url, e.to_string()))
    }
}

#[async_trait]
impl ContentSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn services(&self) -> Result<Vec<Service>> {
        Ok(self.fetch_collection("services/public", "services", None).await?.items)
    }

    async fn service(&self, id: u64) -> Result<Service> {
        self.fetch_entity(&format!("services/public/{}", id)).await
    }

    async fn articles(&self, page: Option<u32>) -> Result<Page<Article>> {
        self.fetch_collection("articles/public", "articles", page).await
    }

    async fn article(&self, id: u64) -> Result<Article> {
        self.fetch_entity(&format!("articles/public/{}", id)).await
    }

    async fn projects(&self, page: Option<u32>) -> Result<Page<Project>> {
        self.fetch_collection("projects/public", "projects", page).await
    }

    async fn project(&self, id: u64) -> Result<Project> {
        self.fetch_entity(&format!("projects/public/{}", id)).await
    }

    async fn industry(&self, id: u64) -> Result<Industry> {
        self.fetch_entity(&format!("industries/public/{}", id)).await
    }

    async fn service_projects(&self, service_id: u64) -> Result<Vec<Project>> {
        let path = format!("services/public/{}/projects", service_id);
        Ok(self.fetch_collection(&path, "projects", None).await?.items)
    }

    async fn service_articles(&self, service_id: u64) -> Result<Vec<Article>> {
        let path = format!("services/public/{}/articles", service_id);
        Ok(self.fetch_collection(&path, "articles", None).await?.items)
    }

    async fn industry_articles(&self, industry_id: u64) -> Result<Vec<Article>> {
        let path = format!("industries/public/{}/articles", industry_id);
        Ok(self.fetch_collection(&path, "articles", None).await?.items)
    }
}

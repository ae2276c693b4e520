use crate::config::site_config::SiteConfig;
use crate::core::retry::{with_retry, RetryPolicy};
use crate::domain::model::FetchResult;
use crate::domain::ports::{ContentSource, PageLoad};
use crate::utils::error::{ContentError, ErrorKind, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// What a page can render at any moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState<V> {
    Idle,
    Loading,
    Ready { view: FetchResult<V> },
    NotFound { message: String },
}

impl<V> LoadState<V> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// True when the page shows offline content and should display the banner.
    pub fn show_advisory(&self) -> bool {
        matches!(self, LoadState::Ready { view } if view.is_fallback())
    }

    pub fn view(&self) -> Option<&V> {
        match self {
            LoadState::Ready { view } => Some(view.value()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderSettings {
    /// Upper bound for one attempt, follow-ups included
    pub attempt_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

impl LoaderSettings {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            attempt_timeout: config.page_timeout(),
            retry: config.retry_policy(),
        }
    }
}

/// Drives one page through `Idle → Loading → Ready | NotFound`, degrading to
/// the offline source whenever the remote one cannot deliver.
pub struct ResilientLoader<P: PageLoad> {
    page: P,
    remote: Arc<dyn ContentSource>,
    fallback: Arc<dyn ContentSource>,
    settings: LoaderSettings,
    state: watch::Sender<LoadState<P::View>>,
    lifetime: CancellationToken,
}

impl<P: PageLoad> ResilientLoader<P> {
    pub fn new(
        page: P,
        remote: Arc<dyn ContentSource>,
        fallback: Arc<dyn ContentSource>,
        settings: LoaderSettings,
    ) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            page,
            remote,
            fallback,
            settings,
            state,
            lifetime: CancellationToken::new(),
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn state(&self) -> LoadState<P::View> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState<P::View>> {
        self.state.subscribe()
    }

    /// Token that fires when the page is left; child tokens can scope extra work.
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    /// Aborts any in-flight load. The loader accepts no further loads.
    pub fn navigate_away(&self) {
        tracing::debug!("🚪 {}: navigated away, cancelling", self.page.name());
        self.lifetime.cancel();
    }

    /// Runs one load cycle. Only `LoadInProgress` and `Cancelled` are returned
    /// as errors; every content failure ends in a renderable state.
    pub async fn load(&self) -> Result<LoadState<P::View>> {
        if self.lifetime.is_cancelled() {
            return Err(ContentError::Cancelled);
        }

        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = LoadState::Loading;
                true
            }
        });
        if !started {
            tracing::debug!("⏳ {}: load requested while loading, ignored", self.page.name());
            return Err(ContentError::LoadInProgress {
                page: self.page.name().to_string(),
            });
        }

        tracing::info!("📥 {}: loading from {}", self.page.name(), self.remote.name());

        let outcome = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            outcome = self.fetch_remote() => Some(outcome),
        };

        let Some(outcome) = outcome else {
            self.state.send_replace(LoadState::Idle);
            return Err(ContentError::Cancelled);
        };

        let next = match outcome {
            Ok(view) => {
                tracing::info!("✅ {}: ready with live content", self.page.name());
                LoadState::Ready {
                    view: FetchResult::Ok { data: view },
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("🔍 {}: {}", self.page.name(), e);
                LoadState::NotFound {
                    message: e.user_friendly_message(),
                }
            }
            Err(e) => self.degrade(e).await,
        };

        self.state.send_replace(next.clone());
        Ok(next)
    }

    /// User-triggered "Try again".
    pub async fn retry(&self) -> Result<LoadState<P::View>> {
        tracing::info!("🔁 {}: retry requested", self.page.name());
        self.load().await
    }

    async fn fetch_remote(&self) -> Result<P::View> {
        let remote = self.remote.as_ref();
        let timeout = self.settings.attempt_timeout;

        with_retry(&self.settings.retry, self.page.name(), || async move {
            match tokio::time::timeout(timeout, self.page.load(remote)).await {
                Ok(result) => result,
                Err(_) => Err(ContentError::TimeoutError { after: timeout }),
            }
        })
        .await
    }

    async fn degrade(&self, cause: ContentError) -> LoadState<P::View> {
        tracing::warn!(
            "⚠️ {}: remote load failed ({}), falling back to {} content",
            self.page.name(),
            cause,
            self.fallback.name()
        );

        match self.page.load(self.fallback.as_ref()).await {
            Ok(view) => LoadState::Ready {
                view: FetchResult::Fallback {
                    fallback: view,
                    reason: cause.user_friendly_message(),
                },
            },
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::error!(
                        "❌ {}: offline content unavailable: {} ({})",
                        self.page.name(),
                        e,
                        e.recovery_suggestion()
                    );
                }
                LoadState::NotFound {
                    message: e.user_friendly_message(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{RemoteSource, StaticSource};
    use crate::domain::model::Service;
    use crate::domain::slug::{resolve_by_slug, Slug};
    use async_trait::async_trait;
    use httpmock::prelude::*;

    struct ServiceNamesPage;

    #[async_trait]
    impl PageLoad for ServiceNamesPage {
        type View = Vec<String>;

        fn name(&self) -> &str {
            "service-names"
        }

        async fn load(&self, source: &dyn ContentSource) -> Result<Vec<String>> {
            let services = source.services().await?;
            Ok(services.into_iter().map(|s| s.title).collect())
        }
    }

    struct ServiceBySlugPage(Slug);

    #[async_trait]
    impl PageLoad for ServiceBySlugPage {
        type View = Service;

        fn name(&self) -> &str {
            "service-by-slug"
        }

        async fn load(&self, source: &dyn ContentSource) -> Result<Service> {
            let services = source.services().await?;
            Ok(resolve_by_slug(&services, &self.0)?.clone())
        }
    }

    fn fast_settings() -> LoaderSettings {
        LoaderSettings {
            attempt_timeout: Duration::from_secs(5),
            retry: RetryPolicy {
                max_retries: 1,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(2),
                backoff_multiplier: 2.0,
            },
        }
    }

    fn loader<P: PageLoad>(page: P, server: &MockServer, settings: LoaderSettings) -> ResilientLoader<P> {
        let remote = RemoteSource::new(server.base_url(), Duration::from_secs(5)).unwrap();
        let fallback = StaticSource::embedded().unwrap();
        ResilientLoader::new(page, Arc::new(remote), Arc::new(fallback), settings)
    }

    fn offline_service_names() -> Vec<String> {
        StaticSource::embedded()
            .unwrap()
            .catalog()
            .services
            .iter()
            .map(|s| s.title.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_remote_success_is_ready_without_advisory() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200)
                    .json_body(serde_json::json!({"data": [{"id": 1, "title": "Brand Strategy"}]}));
            })
            .await;

        let loader = loader(ServiceNamesPage, &server, fast_settings());
        assert_eq!(loader.state(), LoadState::Idle);

        let state = loader.load().await.unwrap();

        assert_eq!(state.view(), Some(&vec!["Brand Strategy".to_string()]));
        assert!(!state.show_advisory());
        assert_eq!(loader.state(), state);
    }

    #[tokio::test]
    async fn test_primary_failure_degrades_to_offline_content() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(500);
            })
            .await;

        let loader = loader(ServiceNamesPage, &server, fast_settings());
        let state = loader.load().await.unwrap();

        // one attempt plus one retry
        api_mock.assert_hits_async(2).await;
        assert!(state.show_advisory());
        assert_eq!(state.view(), Some(&offline_service_names()));
    }

    #[tokio::test]
    async fn test_slug_miss_is_not_found_without_fallback() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200).json_body(serde_json::json!([{"id": 1, "title": "Brand Strategy"}]));
            })
            .await;

        let loader = loader(ServiceBySlugPage(Slug::from("no-such-service")), &server, fast_settings());
        let state = loader.load().await.unwrap();

        api_mock.assert_hits_async(1).await;
        assert!(matches!(state, LoadState::NotFound { .. }));
        assert!(!state.show_advisory());
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_offline_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(serde_json::json!([]));
            })
            .await;

        let settings = LoaderSettings {
            attempt_timeout: Duration::from_millis(50),
            retry: RetryPolicy::none(),
        };
        let loader = loader(ServiceNamesPage, &server, settings);
        let state = loader.load().await.unwrap();

        assert!(state.show_advisory());
        assert_eq!(state.view(), Some(&offline_service_names()));
    }

    #[tokio::test]
    async fn test_load_while_loading_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200)
                    .delay(Duration::from_millis(200))
                    .json_body(serde_json::json!([{"id": 1, "title": "Brand Strategy"}]));
            })
            .await;

        let loader = loader(ServiceNamesPage, &server, fast_settings());

        let (first, second) = tokio::join!(loader.load(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            loader.load().await
        });

        assert!(first.unwrap().view().is_some());
        assert!(matches!(second, Err(ContentError::LoadInProgress { .. })));
    }

    #[tokio::test]
    async fn test_navigate_away_cancels_in_flight_load() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(serde_json::json!([]));
            })
            .await;

        let loader = loader(ServiceNamesPage, &server, fast_settings());
        let mut updates = loader.subscribe();

        let (result, _) = tokio::join!(loader.load(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            loader.navigate_away();
        });

        assert!(matches!(result, Err(ContentError::Cancelled)));
        assert_eq!(loader.state(), LoadState::Idle);
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), LoadState::Idle);
        assert!(matches!(loader.load().await, Err(ContentError::Cancelled)));
    }

    #[tokio::test]
    async fn test_retry_reloads_after_fallback() {
        let server = MockServer::start_async().await;
        let mut failing = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(503);
            })
            .await;

        let loader = loader(ServiceNamesPage, &server, fast_settings());
        assert!(loader.load().await.unwrap().show_advisory());

        failing.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/services/public");
                then.status(200).json_body(serde_json::json!([{"id": 9, "title": "Back Online"}]));
            })
            .await;

        let state = loader.retry().await.unwrap();
        assert!(!state.show_advisory());
        assert_eq!(state.view(), Some(&vec!["Back Online".to_string()]));
    }
}

use crate::metrics::Metrics;
use folio_client::{ContentSource, RemoteStore};
use folio_core::{FolioError, IndexTree, ProbeStrategy};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;

pub type SharedState = Arc<AppState>;

pub struct CachedIndex {
    pub tree: Arc<IndexTree>,
    pub fetched_at: Instant,
}

pub struct AppState {
    pub store: RemoteStore,
    pub probe: ProbeStrategy,
    pub metrics: Metrics,
    ttl: Duration,
    index: RwLock<Option<CachedIndex>>,
}

impl AppState {
    pub fn new(store: RemoteStore, probe: ProbeStrategy, ttl: Duration) -> Self {
        Self {
            store,
            probe,
            metrics: Metrics::default(),
            ttl,
            index: RwLock::new(None),
        }
    }

    /// Current index tree, refetched whole once the cached one is older than the TTL
    pub async fn index(&self) -> Result<Arc<IndexTree>, FolioError> {
        {
            let cached = self.index.read().await;
            if let Some(cached) = cached.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    Metrics::incr(&self.metrics.index_cache_hits);
                    return Ok(Arc::clone(&cached.tree));
                }
            }
        }

        Metrics::incr(&self.metrics.index_cache_misses);
        self.refresh().await
    }

    /// Fetch a fresh tree and replace the cached one.
    /// On failure the cache is left as it was.
    pub async fn refresh(&self) -> Result<Arc<IndexTree>, FolioError> {
        let tree = Arc::new(self.store.fetch_index().await?);
        info!(
            base_url = self.store.base_url(),
            entries = tree.root().len(),
            "index refreshed"
        );

        let mut cached = self.index.write().await;
        *cached = Some(CachedIndex {
            tree: Arc::clone(&tree),
            fetched_at: Instant::now(),
        });
        Ok(tree)
    }

    pub async fn cache_age(&self) -> Option<Duration> {
        self.index
            .read()
            .await
            .as_ref()
            .map(|cached| cached.fetched_at.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_index(expected_fetches: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"about": {"title": "About", "date": "2025-01-01"}}"#),
            )
            .expect(expected_fetches)
            .mount(&server)
            .await;
        server
    }

    fn state(server: &MockServer, ttl: Duration) -> AppState {
        let store = RemoteStore::new(&server.uri()).unwrap();
        AppState::new(store, ProbeStrategy::Sequential, ttl)
    }

    #[tokio::test]
    async fn index_is_cached_within_ttl() {
        let server = server_with_index(1).await;
        let state = state(&server, Duration::from_secs(60));

        let first = state.index().await.unwrap();
        let second = state.index().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.metrics.index_cache_hits.load(Ordering::Relaxed), 1);
        assert_eq!(state.metrics.index_cache_misses.load(Ordering::Relaxed), 1);
        assert!(state.cache_age().await.is_some());
    }

    #[tokio::test]
    async fn expired_index_is_refetched() {
        let server = server_with_index(2).await;
        let state = state(&server, Duration::ZERO);

        let first = state.index().await.unwrap();
        let second = state.index().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_nothing_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let state = state(&server, Duration::from_secs(60));

        assert!(state.index().await.unwrap_err().is_index_failure());
        assert!(state.cache_age().await.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_tree() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"about": {"title": "About", "date": "2025-01-01"}}"#),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/index.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let state = state(&server, Duration::ZERO);

        let first = state.index().await.unwrap();
        assert!(state.refresh().await.unwrap_err().is_index_failure());
        assert!(state.index().await.unwrap_err().is_index_failure());

        assert!(state.cache_age().await.is_some());
        let cached = state.index.read().await;
        let kept = &cached.as_ref().unwrap().tree;
        assert!(Arc::ptr_eq(&first, kept));
    }
}

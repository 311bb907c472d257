//! HTTP client for the remote content store

use async_trait::async_trait;
use folio_core::config::ContentConfig;
use folio_core::{FolioError, IndexTree};
use reqwest::{StatusCode, Url};
use tracing::debug;

/// Where the index tree and document bodies come from.
///
/// Every call is an independent fetch; implementations do not cache.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch and parse the whole index tree
    async fn fetch_index(&self) -> Result<IndexTree, FolioError>;

    /// Fetch a raw document body by store-relative path.
    /// The path is `/`-separated unencoded segments; encoding is the source's job.
    /// A missing document is `Ok(None)`, not an error.
    async fn fetch_document(&self, path: &str) -> Result<Option<String>, FolioError>;
}

/// Content store reached over HTTP at one fixed base origin
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base: Url,
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self, FolioError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, FolioError> {
        let invalid = || FolioError::InvalidBaseUrl(base_url.to_string());
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(base.scheme(), "http" | "https")
            || base.cannot_be_a_base()
            || !base.host_str().is_some_and(|h| !h.is_empty())
        {
            return Err(invalid());
        }
        Ok(Self {
            base,
            base_url: trimmed.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a `/`-separated store path. Each segment is percent-encoded,
    /// so `#`, `?` and `%` inside a key stay part of that segment.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}

#[async_trait]
impl ContentSource for RemoteStore {
    async fn fetch_index(&self) -> Result<IndexTree, FolioError> {
        let url = self.url_for(ContentConfig::INDEX_FILE);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FolioError::IndexUnavailable {
                status: None,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FolioError::IndexUnavailable {
                status: Some(status.as_u16()),
                message: format!(
                    "GET {} returned {}",
                    url,
                    status.canonical_reason().unwrap_or("an error")
                ),
            });
        }

        let body = resp.text().await.map_err(|e| FolioError::IndexUnavailable {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;

        let tree = IndexTree::from_json(&body)?;
        debug!(url = %url, entries = tree.root().len(), "fetched index");
        Ok(tree)
    }

    async fn fetch_document(&self, path: &str) -> Result<Option<String>, FolioError> {
        if path.split('/').any(|s| s == "." || s == "..") {
            debug!(path, "dot segment in document path");
            return Ok(None);
        }

        let url = self.url_for(path);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FolioError::ContentUnavailable {
                url: url.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "document not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FolioError::ContentUnavailable {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| FolioError::ContentUnavailable {
            url: url.to_string(),
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;
        Ok(Some(body))
    }
}

//! In-memory content source for tests

use crate::store::ContentSource;
use async_trait::async_trait;
use folio_core::{FolioError, IndexTree};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MemorySource {
    index: String,
    documents: HashMap<String, String>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            ..Default::default()
        }
    }

    pub fn document(mut self, path: &str, body: &str) -> Self {
        self.documents.insert(path.to_string(), body.to_string());
        self
    }

    /// Answer `path` with an unexpected server error
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn delayed(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Document paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch_index(&self) -> Result<IndexTree, FolioError> {
        IndexTree::from_json(&self.index)
    }

    async fn fetch_document(&self, path: &str) -> Result<Option<String>, FolioError> {
        self.requests.lock().unwrap().push(path.to_string());
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(path) {
            return Err(FolioError::ContentUnavailable {
                url: path.to_string(),
                status: Some(500),
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(self.documents.get(path).cloned())
    }
}

//! Navigation session shared by the CLI and the service
//!
//! A session fetches the index once and holds it read-only. Reloading swaps
//! in a freshly fetched tree as a whole. Collapse state is not kept here; it
//! belongs to whoever renders the sidebar and is passed in per call.

use crate::resolver::ContentResolver;
use crate::store::ContentSource;
use crate::tracker::RequestTracker;
use folio_core::{
    project, search, Child, CollapseState, DocumentEntry, FolioError, IndexTree,
    NavigationEntry, ProbeStrategy, ResolvedDocument, Slug,
};
use std::sync::Arc;
use tracing::debug;

/// Outcome of navigating to a slug
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Loaded(ResolvedDocument),
    NotFound(Slug),
    /// A newer navigation was issued before this one finished
    Superseded(Slug),
}

pub struct Session<S> {
    source: S,
    tree: Arc<IndexTree>,
    tracker: RequestTracker,
    probe: ProbeStrategy,
}

impl<S: ContentSource> Session<S> {
    /// Fetch the index and start a session over it
    pub async fn open(source: S) -> Result<Self, FolioError> {
        let tree = source.fetch_index().await?;
        Ok(Self {
            source,
            tree: Arc::new(tree),
            tracker: RequestTracker::new(),
            probe: ProbeStrategy::default(),
        })
    }

    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }

    pub fn tree(&self) -> &Arc<IndexTree> {
        &self.tree
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Refetch the index and replace the current tree.
    /// On failure the previous tree stays in place.
    pub async fn reload(&mut self) -> Result<(), FolioError> {
        let tree = self.source.fetch_index().await?;
        self.tree = Arc::new(tree);
        Ok(())
    }

    pub fn resolver(&self) -> ContentResolver<'_, S> {
        ContentResolver::new(&self.source, &self.tree).with_probe(self.probe)
    }

    /// Resolve `slug`, discarding the result if a newer navigation started
    /// while it was in flight.
    pub async fn navigate(&self, slug: Slug) -> Result<Navigation, FolioError> {
        let ticket = self.tracker.begin(slug.clone());
        let tree = Arc::clone(&self.tree);
        let outcome = ContentResolver::new(&self.source, &tree)
            .with_probe(self.probe)
            .resolve(&slug)
            .await;

        if !self.tracker.is_current(&ticket) {
            debug!(slug = %ticket.slug(), "navigation superseded");
            return Ok(Navigation::Superseded(slug));
        }

        Ok(match outcome? {
            Some(doc) => Navigation::Loaded(doc),
            None => Navigation::NotFound(slug),
        })
    }

    pub fn sidebar(&self, state: &CollapseState) -> Vec<NavigationEntry> {
        project(&self.tree, state)
    }

    pub fn documents(&self) -> Vec<DocumentEntry> {
        self.tree.flatten_documents()
    }

    pub fn paths(&self) -> Vec<String> {
        self.tree.flatten_addressable_paths()
    }

    pub fn children(&self, slug: &Slug) -> Vec<Child<'_>> {
        self.tree.children_of(slug.segments())
    }

    pub fn search(&self, query: &str) -> Vec<DocumentEntry> {
        let documents = self.documents();
        search(&documents, query).into_iter().cloned().collect()
    }
}

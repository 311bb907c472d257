//! Slug to document resolution with folder-index fallback
//!
//! A slug `a/b` is served by `a/b.md` when that body exists, and by
//! `a/b/index.md` otherwise. The empty slug is served by `index.md`.
//! Metadata always comes from the index tree; when the tree has no entry for
//! a body that exists, a placeholder is used and the drift is logged.

use crate::store::ContentSource;
use folio_core::config::ContentConfig;
use folio_core::{
    DocumentMetadata, FolioError, IndexTree, ProbeStrategy, ResolvedDocument, Slug, INDEX_KEY,
};
use tracing::{debug, warn};

/// Title used when the root document has no index entry
pub const UNTITLED: &str = "Untitled";

/// Which probe produced the body
enum Hit {
    File(String),
    FolderIndex(String),
}

/// Resolves slugs against one index tree and one content source
pub struct ContentResolver<'a, S: ?Sized> {
    source: &'a S,
    tree: &'a IndexTree,
    probe: ProbeStrategy,
}

impl<'a, S: ContentSource + ?Sized> ContentResolver<'a, S> {
    pub fn new(source: &'a S, tree: &'a IndexTree) -> Self {
        Self {
            source,
            tree,
            probe: ProbeStrategy::Sequential,
        }
    }

    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }

    /// Resolve `slug` to a document body and its metadata.
    ///
    /// `Ok(None)` is the expected not-found outcome. Errors are reserved for
    /// unexpected store failures.
    pub async fn resolve(&self, slug: &Slug) -> Result<Option<ResolvedDocument>, FolioError> {
        if !slug.is_addressable() {
            debug!(slug = %slug, "slug contains an index segment");
            return Ok(None);
        }

        if slug.is_root() {
            let path = format!("{}.{}", INDEX_KEY, ContentConfig::EXTENSION);
            let Some(content) = self.source.fetch_document(&path).await? else {
                return Ok(None);
            };
            let metadata = self.tree.resolve(slug.segments());
            return Ok(Some(self.assemble(slug, metadata, content)));
        }

        let joined = slug.join();
        let file_path = format!("{}.{}", joined, ContentConfig::EXTENSION);
        let index_path = format!("{}/{}.{}", joined, INDEX_KEY, ContentConfig::EXTENSION);

        let hit = match self.probe {
            ProbeStrategy::Sequential => match self.source.fetch_document(&file_path).await? {
                Some(body) => Some(Hit::File(body)),
                None => self
                    .source
                    .fetch_document(&index_path)
                    .await?
                    .map(Hit::FolderIndex),
            },
            ProbeStrategy::Parallel => {
                let (file, index) = tokio::join!(
                    self.source.fetch_document(&file_path),
                    self.source.fetch_document(&index_path)
                );
                match file? {
                    Some(body) => Some(Hit::File(body)),
                    None => index?.map(Hit::FolderIndex),
                }
            }
        };

        let resolved = match hit {
            Some(Hit::File(content)) => {
                let metadata = self.tree.resolve(slug.segments());
                Some(self.assemble(slug, metadata, content))
            }
            Some(Hit::FolderIndex(content)) => {
                let index_slug = slug.child(INDEX_KEY);
                let metadata = self.tree.resolve(index_slug.segments());
                Some(self.assemble(slug, metadata, content))
            }
            None => {
                debug!(slug = %slug, "no file or folder index");
                None
            }
        };
        Ok(resolved)
    }

    fn assemble(
        &self,
        slug: &Slug,
        metadata: Option<&DocumentMetadata>,
        content: String,
    ) -> ResolvedDocument {
        let (metadata, indexed) = match metadata {
            Some(meta) => (meta.clone(), true),
            None => {
                warn!(slug = %slug, "document has a body but no index entry, using placeholder metadata");
                (placeholder_for(slug), false)
            }
        };
        ResolvedDocument {
            slug: slug.join(),
            metadata,
            content,
            indexed,
        }
    }
}

fn placeholder_for(slug: &Slug) -> DocumentMetadata {
    DocumentMetadata::placeholder(slug.last().unwrap_or(UNTITLED))
}

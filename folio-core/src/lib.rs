//! Folio Core - Index tree for remote markdown content
//!
//! This library provides the content index model: parsing the hierarchical
//! index of documents and folders, resolving slugs against it, flattening it
//! for search and path enumeration, and projecting it into a collapsible
//! sidebar.

pub mod config;
pub mod document;
pub mod error;
pub mod nav;
pub mod outline;
pub mod search;
pub mod tree;

pub use config::{Config, ProbeStrategy};
pub use document::{DocumentEntry, DocumentMetadata, ResolvedDocument, Slug, INDEX_KEY};
pub use error::{ErrorEnvelope, FolioError};
pub use nav::{project, CollapseState, NavigationEntry};
pub use outline::{outline, Heading};
pub use search::search;
pub use tree::{Child, Folder, IndexNode, IndexTree, NodeKind};

/// Result type alias for folio operations
pub type Result<T> = std::result::Result<T, FolioError>;

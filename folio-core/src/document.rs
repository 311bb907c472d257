//! Document model: metadata, slugs and resolved documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a folder's own landing document.
pub const INDEX_KEY: &str = "index";

/// Metadata for one document, as carried by the index tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    /// Display string only; never parsed or used for ordering.
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl DocumentMetadata {
    /// Stand-in metadata for a document body that has no index entry.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: String::new(),
            tags: Vec::new(),
            summary: None,
        }
    }
}

/// Ordered path segments addressing a document or folder.
///
/// The empty slug is the site root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Slug(Vec<String>);

impl Slug {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Split a routing path on `/`, dropping empty segments
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// `index` is a resolution marker, never an addressable segment.
    /// Dot segments would walk out of the store path and are refused too.
    pub fn is_addressable(&self) -> bool {
        !self
            .0
            .iter()
            .any(|s| s == INDEX_KEY || s == "." || s == "..")
    }

    /// Segments joined with `/` (empty for the root)
    pub fn join(&self) -> String {
        self.0.join("/")
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.join())
    }
}

/// A document entry produced by flattening the index tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentEntry {
    pub slug: String,
    pub metadata: DocumentMetadata,
}

/// A document body paired with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDocument {
    pub slug: String,
    pub metadata: DocumentMetadata,
    pub content: String,
    /// False when `metadata` is a placeholder because the index has no entry.
    pub indexed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_parse_drops_empty_segments() {
        let slug = Slug::parse("/posts//hello/");
        assert_eq!(slug.segments(), &["posts".to_string(), "hello".to_string()]);
        assert_eq!(slug.join(), "posts/hello");
        assert_eq!(slug.to_string(), "/posts/hello");
        assert!(Slug::parse("").is_root());
        assert!(Slug::parse("///").is_root());
    }

    #[test]
    fn test_index_segment_not_addressable() {
        assert!(Slug::parse("posts/hello").is_addressable());
        assert!(!Slug::parse("posts/index").is_addressable());
        assert!(!Slug::parse("index").is_addressable());
        assert!(Slug::root().is_addressable());
        assert!(!Slug::parse("posts/../secrets").is_addressable());
        assert!(!Slug::parse("./posts").is_addressable());
    }

    #[test]
    fn test_metadata_optional_fields() {
        let meta: DocumentMetadata =
            serde_json::from_str(r#"{"title":"Hello","date":"2025-01-01"}"#).unwrap();
        assert!(meta.tags.is_empty());
        assert_eq!(meta.summary, None);

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"title":"Hello","date":"2025-01-01"}"#);
    }
}

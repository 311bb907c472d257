//! Index tree model
//!
//! The remote `index.json` is a nested object keyed by path segment. Each value
//! is either a document's metadata or another folder. Classification happens
//! once, at parse time: an object with a non-empty string `title` and a string
//! `date` is a document, anything else is a folder. Key order of the source
//! JSON is kept and drives every traversal below.

use crate::document::{DocumentEntry, DocumentMetadata, INDEX_KEY};
use crate::error::FolioError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Folder,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Folder => "folder",
        }
    }
}

/// A node of the index tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndexNode {
    Document(DocumentMetadata),
    Folder(Folder),
}

impl IndexNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Document(_) => NodeKind::Document,
            Self::Folder(_) => NodeKind::Folder,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentMetadata> {
        match self {
            Self::Document(meta) => Some(meta),
            Self::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Document(_) => None,
        }
    }
}

/// Ordered children of a folder, keyed by path segment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Folder {
    children: IndexMap<String, IndexNode>,
}

impl Folder {
    pub fn get(&self, key: &str) -> Option<&IndexNode> {
        self.children.get(key)
    }

    /// The folder's landing document, if it has one
    pub fn index(&self) -> Option<&DocumentMetadata> {
        self.children.get(INDEX_KEY).and_then(IndexNode::as_document)
    }

    /// All children in insertion order, `index` included
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Children shown in listings: insertion order, `index` excluded
    pub fn listed(&self) -> impl Iterator<Item = (&str, &IndexNode)> {
        self.iter().filter(|(k, _)| *k != INDEX_KEY)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// One immediate child of a folder
#[derive(Debug, Clone, Serialize)]
pub struct Child<'a> {
    pub key: &'a str,
    pub kind: NodeKind,
    #[serde(rename = "data")]
    pub node: &'a IndexNode,
}

/// The whole index, rooted at an always-folder node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndexTree {
    root: Folder,
}

impl IndexTree {
    /// Parse and shape-check a serialized index
    pub fn from_json(source: &str) -> crate::Result<Self> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| FolioError::malformed("", e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                root: parse_folder(map, "")?,
            }),
            other => Err(FolioError::malformed(
                "",
                format!("root must be an object, found {}", json_type(&other)),
            )),
        }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    /// Metadata of the document at `slug`.
    ///
    /// The empty slug yields the root `index` document. A slug that ends on a
    /// folder yields `None`; folder-index fallback is the content resolver's job.
    pub fn resolve<S: AsRef<str>>(&self, slug: &[S]) -> Option<&DocumentMetadata> {
        if slug.is_empty() {
            return self.root.index();
        }
        self.node_at(slug)?.as_document()
    }

    /// Node reached by walking `slug` from the root. Empty slugs have no node.
    pub fn node_at<S: AsRef<str>>(&self, slug: &[S]) -> Option<&IndexNode> {
        let (first, rest) = slug.split_first()?;
        let mut node = self.root.get(first.as_ref())?;
        for segment in rest {
            node = node.as_folder()?.get(segment.as_ref())?;
        }
        Some(node)
    }

    pub fn folder_at<S: AsRef<str>>(&self, slug: &[S]) -> Option<&Folder> {
        if slug.is_empty() {
            return Some(&self.root);
        }
        self.node_at(slug)?.as_folder()
    }

    /// Immediate children of the folder at `slug`, excluding `index`.
    /// Empty when `slug` does not reach a folder.
    pub fn children_of<S: AsRef<str>>(&self, slug: &[S]) -> Vec<Child<'_>> {
        let Some(folder) = self.folder_at(slug) else {
            return Vec::new();
        };
        folder
            .listed()
            .map(|(key, node)| Child {
                key,
                kind: node.kind(),
                node,
            })
            .collect()
    }

    /// Every document in depth-first, key-insertion order.
    ///
    /// `index` documents are included under their full slug (`posts/index`).
    pub fn flatten_documents(&self) -> Vec<DocumentEntry> {
        let mut out = Vec::new();
        collect_documents(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Every directly navigable path, documents and folders alike, in the
    /// same order as [`flatten_documents`](Self::flatten_documents).
    ///
    /// `index` keys are skipped at every level; the root itself is the empty
    /// slug and is not listed.
    pub fn flatten_addressable_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_paths(&self.root, &mut Vec::new(), &mut out);
        out
    }
}

fn collect_documents<'a>(
    folder: &'a Folder,
    prefix: &mut Vec<&'a str>,
    out: &mut Vec<DocumentEntry>,
) {
    for (key, node) in folder.iter() {
        prefix.push(key);
        match node {
            IndexNode::Document(meta) => out.push(DocumentEntry {
                slug: prefix.join("/"),
                metadata: meta.clone(),
            }),
            IndexNode::Folder(child) => collect_documents(child, prefix, out),
        }
        prefix.pop();
    }
}

fn collect_paths<'a>(folder: &'a Folder, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    for (key, node) in folder.listed() {
        prefix.push(key);
        out.push(prefix.join("/"));
        if let IndexNode::Folder(child) = node {
            collect_paths(child, prefix, out);
        }
        prefix.pop();
    }
}

fn is_document_shape(map: &Map<String, Value>) -> bool {
    let has_title = matches!(map.get("title"), Some(Value::String(t)) if !t.is_empty());
    let has_date = matches!(map.get("date"), Some(Value::String(_)));
    has_title && has_date
}

fn parse_node(value: Value, path: &str) -> crate::Result<IndexNode> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(FolioError::malformed(
                path,
                format!("expected a document or folder object, found {}", json_type(&other)),
            ))
        }
    };

    if is_document_shape(&map) {
        let meta = serde_json::from_value(Value::Object(map))
            .map_err(|e| FolioError::malformed(path, e.to_string()))?;
        Ok(IndexNode::Document(meta))
    } else {
        Ok(IndexNode::Folder(parse_folder(map, path)?))
    }
}

fn parse_folder(map: Map<String, Value>, path: &str) -> crate::Result<Folder> {
    let mut children = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}/{}", path, key)
        };
        let node = parse_node(value, &child_path)?;
        children.insert(key, node);
    }
    Ok(Folder { children })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTS: &str = r#"{
        "posts": {
            "hello": {"title": "Hello", "date": "2025-01-01"},
            "index": {"title": "Posts", "date": "2025-01-01"}
        }
    }"#;

    const SITE: &str = r#"{
        "index": {"title": "Home", "date": "2024-12-01"},
        "about": {"title": "About", "date": "2024-12-02", "tags": ["meta"]},
        "posts": {
            "index": {"title": "Posts", "date": "2025-01-01"},
            "hello": {"title": "Hello", "date": "2025-01-01", "summary": "first"},
            "rust": {
                "ownership": {"title": "Ownership", "date": "2025-02-01"},
                "traits": {"title": "Traits", "date": "2025-02-03"}
            }
        },
        "drafts": {}
    }"#;

    fn tree(src: &str) -> IndexTree {
        IndexTree::from_json(src).unwrap()
    }

    #[test]
    fn test_classification() {
        let t = tree(SITE);
        assert_eq!(t.root().get("about").unwrap().kind(), NodeKind::Document);
        assert_eq!(t.root().get("posts").unwrap().kind(), NodeKind::Folder);
        assert_eq!(t.root().get("drafts").unwrap().kind(), NodeKind::Folder);
    }

    #[test]
    fn test_incomplete_document_is_folder() {
        // Without a date the object is a folder, whose "title" child is not an object
        let err = IndexTree::from_json(r#"{"x": {"title": "X"}}"#).unwrap_err();
        assert!(matches!(err, FolioError::MalformedIndex { ref path, .. } if path == "x/title"));

        let err = IndexTree::from_json(r#"{"x": {"title": "", "date": "2025-01-01"}}"#).unwrap_err();
        assert!(matches!(err, FolioError::MalformedIndex { ref path, .. } if path == "x/title"));

        let t = tree(r#"{"x": {"y": {}}}"#);
        assert_eq!(t.root().get("x").unwrap().kind(), NodeKind::Folder);
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(matches!(
            IndexTree::from_json("[]"),
            Err(FolioError::MalformedIndex { .. })
        ));
        assert!(matches!(
            IndexTree::from_json("{not json"),
            Err(FolioError::MalformedIndex { .. })
        ));
        let err = IndexTree::from_json(r#"{"a": {"b": 3}}"#).unwrap_err();
        assert!(matches!(err, FolioError::MalformedIndex { ref path, .. } if path == "a/b"));
        let err = IndexTree::from_json(r#"{"a": {"title": "A", "date": "d", "tags": "x"}}"#)
            .unwrap_err();
        assert!(matches!(err, FolioError::MalformedIndex { ref path, .. } if path == "a"));
    }

    #[test]
    fn test_resolve_scenario() {
        let t = tree(POSTS);
        let hello = t.resolve(&["posts", "hello"]).unwrap();
        assert_eq!(hello.title, "Hello");
        assert_eq!(hello.date, "2025-01-01");
        // A folder is not a document, even with an index entry
        assert!(t.resolve(&["posts"]).is_none());
        assert_eq!(t.resolve(&["posts", "index"]).unwrap().title, "Posts");
        assert!(t.resolve(&["posts", "missing"]).is_none());
        assert!(t.resolve(&["posts", "hello", "deeper"]).is_none());
    }

    #[test]
    fn test_resolve_root() {
        assert_eq!(tree(SITE).resolve::<&str>(&[]).unwrap().title, "Home");
        assert!(tree(POSTS).resolve::<&str>(&[]).is_none());
        assert!(tree("{}").resolve::<&str>(&[]).is_none());
    }

    #[test]
    fn test_children_of() {
        let t = tree(SITE);
        let root: Vec<_> = t
            .children_of::<&str>(&[])
            .iter()
            .map(|c| (c.key, c.kind))
            .collect();
        assert_eq!(
            root,
            vec![
                ("about", NodeKind::Document),
                ("posts", NodeKind::Folder),
                ("drafts", NodeKind::Folder),
            ]
        );

        let posts: Vec<_> = t.children_of(&["posts"]).iter().map(|c| c.key).collect();
        assert_eq!(posts, vec!["hello", "rust"]);

        assert!(t.children_of(&["about"]).is_empty());
        assert!(t.children_of(&["nope"]).is_empty());
        assert!(t.children_of(&["drafts"]).is_empty());
    }

    #[test]
    fn test_flatten_documents_order() {
        let slugs: Vec<_> = tree(SITE)
            .flatten_documents()
            .into_iter()
            .map(|d| d.slug)
            .collect();
        assert_eq!(
            slugs,
            vec![
                "index",
                "about",
                "posts/index",
                "posts/hello",
                "posts/rust/ownership",
                "posts/rust/traits",
            ]
        );
    }

    #[test]
    fn test_flatten_empty_tree() {
        let t = tree("{}");
        assert!(t.flatten_documents().is_empty());
        assert!(t.flatten_addressable_paths().is_empty());
    }

    #[test]
    fn test_flatten_addressable_paths() {
        assert_eq!(
            tree(SITE).flatten_addressable_paths(),
            vec![
                "about",
                "posts",
                "posts/hello",
                "posts/rust",
                "posts/rust/ownership",
                "posts/rust/traits",
                "drafts",
            ]
        );
    }

    #[test]
    fn test_flattened_documents_all_resolve() {
        let t = tree(SITE);
        let docs = t.flatten_documents();
        for doc in &docs {
            let segments: Vec<&str> = doc.slug.split('/').collect();
            assert_eq!(t.resolve(&segments), Some(&doc.metadata), "slug {}", doc.slug);

            // The last segment is a key of its parent folder
            let (last, parent) = segments.split_last().unwrap();
            let folder = t.folder_at(parent).unwrap();
            assert_eq!(folder.get(last).unwrap().kind(), NodeKind::Document);
        }
        assert_eq!(docs.len(), 6);
    }

    #[test]
    fn test_serializes_back_in_order() {
        let t = tree(POSTS);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            r#"{"posts":{"hello":{"title":"Hello","date":"2025-01-01"},"index":{"title":"Posts","date":"2025-01-01"}}}"#
        );
    }
}

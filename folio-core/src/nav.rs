//! Collapsible sidebar projection of the index tree

use crate::tree::{Folder, IndexNode, IndexTree, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub kind: NodeKind,
    pub path: String,
    pub title: String,
    pub depth: usize,
    /// Always false for documents
    pub collapsed: bool,
}

/// Set of collapsed folder paths, owned by whoever renders the sidebar.
///
/// Membership is tracked per path only. Collapsing or expanding a folder
/// leaves the recorded state of its descendants untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseState {
    collapsed: BTreeSet<String>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// Flip a folder's state. Returns true if the folder is now collapsed.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.collapsed.remove(path) {
            false
        } else {
            self.collapsed.insert(path.to_string());
            true
        }
    }

    pub fn collapse(&mut self, path: impl Into<String>) {
        self.collapsed.insert(path.into());
    }

    pub fn expand(&mut self, path: &str) {
        self.collapsed.remove(path);
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.collapsed.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CollapseState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            collapsed: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Depth-first sidebar rows for `tree`, hiding everything below collapsed folders
pub fn project(tree: &IndexTree, state: &CollapseState) -> Vec<NavigationEntry> {
    let mut entries = Vec::new();
    project_folder(tree.root(), "", 0, state, &mut entries);
    entries
}

fn project_folder(
    folder: &Folder,
    prefix: &str,
    depth: usize,
    state: &CollapseState,
    out: &mut Vec<NavigationEntry>,
) {
    for (key, node) in folder.listed() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", prefix, key)
        };

        match node {
            IndexNode::Document(meta) => out.push(NavigationEntry {
                kind: NodeKind::Document,
                path,
                title: meta.title.clone(),
                depth,
                collapsed: false,
            }),
            IndexNode::Folder(child) => {
                let collapsed = state.is_collapsed(&path);
                out.push(NavigationEntry {
                    kind: NodeKind::Folder,
                    path: path.clone(),
                    title: key.to_string(),
                    depth,
                    collapsed,
                });
                if !collapsed {
                    project_folder(child, &path, depth + 1, state, out);
                }
            }
        }
    }
}
